//! `reqwest` implementation of `HttpTransport`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, Url};
use tracing::{debug, info};

use ms_core::errors::TransportError;
use ms_core::gateway::{HttpMethod, HttpRequest, HttpTransport, RawResponse};
use ms_shared::HttpConfig;

use crate::error::{InfraError, InfraResult};

/// Transport backed by a pooled `reqwest::Client`
///
/// The client keeps a cookie jar, so the `HttpOnly` refresh cookie set by
/// the login answer is sent back on `/refresh` without the session ever
/// seeing it.
pub struct ReqwestTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Create a transport with an empty cookie jar
    pub fn new(config: &HttpConfig) -> InfraResult<Self> {
        Self::with_jar(config, Arc::new(Jar::default()))
    }

    /// Create a transport around an existing cookie jar
    ///
    /// # Arguments
    ///
    /// * `config` - Timeouts, pool size and user agent
    /// * `jar` - Cookie jar shared with the caller
    pub fn with_jar(config: &HttpConfig, jar: Arc<Jar>) -> InfraResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()?;

        info!(
            timeout_secs = config.request_timeout_secs,
            user_agent = %config.user_agent,
            "HTTP transport initialized"
        );
        Ok(Self { client, jar })
    }

    /// `Cookie` header value the jar would send to `url`
    pub fn cookie_header(&self, url: &str) -> InfraResult<Option<String>> {
        let url = parse_url(url)?;
        Ok(self
            .jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string)))
    }

    /// Put cookies from a saved `Cookie` header back into the jar
    pub fn restore_cookies(&self, url: &str, header: &str) -> InfraResult<()> {
        let url = parse_url(url)?;
        for cookie in header.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &url);
        }
        debug!(url = %url, "Cookies restored");
        Ok(())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_error)?;
        Ok(RawResponse::new(status, body))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

fn parse_url(url: &str) -> InfraResult<Url> {
    Url::parse(url).map_err(|e| InfraError::InvalidUrl(format!("{}: {}", url, e)))
}
