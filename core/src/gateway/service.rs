//! Authenticated request gateway

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use ms_shared::{mask_url_query, Envelope, ErrorBody, RefreshPolicy, ServiceEndpoints};

use super::request::ApiRequest;
use super::transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse};
use crate::domain::entities::account::RefreshGrant;
use crate::domain::entities::session::SessionState;
use crate::domain::value_objects::{ApiOutcome, PendingStep};
use crate::errors::{GatewayError, GatewayResult};
use crate::session::{ExpiryMark, SessionContext};

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Normalized answer before best-effort handling
enum Reply {
    Success(Value),
    NeedsStep(PendingStep),
}

impl From<Reply> for ApiOutcome {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Success(value) => ApiOutcome::Success(value),
            Reply::NeedsStep(step) => ApiOutcome::NeedsStep(step),
        }
    }
}

/// Wraps every call to the shop services
///
/// For each request the gateway:
/// 1. Attaches the current access token and a JSON content type
/// 2. On a 401 from a non-auth endpoint, refreshes once and retries once
/// 3. Maps 206 to a pending step, other non-2xx to `GatewayError::Status`
/// 4. On an unrecoverable refresh, expires the session and emits force-logout
pub struct RequestGateway<T>
where
    T: HttpTransport,
{
    /// Transport carrying the cookie jar
    transport: Arc<T>,
    /// Holder of the access token
    session: Arc<SessionContext>,
    /// Service base URLs
    endpoints: ServiceEndpoints,
    /// Coordination of concurrent refreshes
    refresh_policy: RefreshPolicy,
    /// Serialises refreshes under `RefreshPolicy::SingleFlight`
    refresh_lock: Mutex<()>,
}

impl<T> RequestGateway<T>
where
    T: HttpTransport,
{
    /// Create a gateway with the default (independent) refresh policy
    pub fn new(transport: Arc<T>, session: Arc<SessionContext>, endpoints: ServiceEndpoints) -> Self {
        Self {
            transport,
            session,
            endpoints,
            refresh_policy: RefreshPolicy::default(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Set the refresh policy
    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    /// Issue a request and normalize its outcome
    ///
    /// Best-effort requests never return `Err`; their failure comes back as
    /// `ApiOutcome::Suppressed` after the session-expiry handling has run.
    pub async fn send(&self, request: ApiRequest) -> GatewayResult<ApiOutcome> {
        match self.dispatch(&request).await {
            Ok(reply) => Ok(reply.into()),
            Err(e) if request.best_effort => {
                warn!(
                    method = %request.method,
                    url = %mask_url_query(&request.url),
                    code = e.code(),
                    "Best-effort request failed, suppressing"
                );
                Ok(ApiOutcome::Suppressed {
                    kind: e.kind(),
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Issue a request and decode a 2xx body as `R`
    ///
    /// Both raw and `{status, data}` bodies are accepted. A 206 answer is
    /// an error here since the caller expects data.
    pub async fn fetch<R>(&self, request: ApiRequest) -> GatewayResult<R>
    where
        R: DeserializeOwned,
    {
        match self.dispatch(&request).await? {
            Reply::Success(value) => decode_body(value),
            Reply::NeedsStep(step) => Err(GatewayError::Status {
                status: 206,
                message: step.message,
            }),
        }
    }

    pub async fn get<R>(&self, url: impl Into<String>) -> GatewayResult<R>
    where
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::get(url)).await
    }

    pub async fn post<B, R>(&self, url: impl Into<String>, body: &B) -> GatewayResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::post(url).json(body)?).await
    }

    pub async fn put<B, R>(&self, url: impl Into<String>, body: &B) -> GatewayResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::put(url).json(body)?).await
    }

    pub async fn delete<R>(&self, url: impl Into<String>) -> GatewayResult<R>
    where
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::delete(url)).await
    }

    /// Fire a bodiless POST whose failure does not matter to the caller
    pub async fn post_best_effort(&self, url: impl Into<String>) -> ApiOutcome {
        let request = ApiRequest::post(url).best_effort();
        match self.send(request).await {
            Ok(outcome) => outcome,
            Err(e) => ApiOutcome::Suppressed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    /// Mint a new access token from the refresh cookie
    ///
    /// A non-2xx answer or an answer without a token means the session is
    /// over: it is marked expired, force-logout is emitted and
    /// `SessionExpired` returned. Transport and parse failures are returned
    /// as such.
    pub async fn refresh(&self) -> GatewayResult<String> {
        let _guard = match self.refresh_policy {
            RefreshPolicy::SingleFlight => Some(self.refresh_lock.lock().await),
            RefreshPolicy::Independent => None,
        };
        let result = self.request_refresh().await;
        self.expire_on_failure(result, &self.endpoints.refresh_url()).await
    }

    async fn request_refresh(&self) -> GatewayResult<String> {
        let url = self.endpoints.refresh_url();
        let request = HttpRequest::new(HttpMethod::Post, url.as_str())
            .with_header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "Token refresh rejected");
            return Err(GatewayError::SessionExpired);
        }

        let grant: RefreshGrant = if response.body.trim().is_empty() {
            RefreshGrant::default()
        } else {
            serde_json::from_str(&response.body)?
        };
        let Some(token) = grant.into_token() else {
            warn!("Token refresh answered without an access token");
            return Err(GatewayError::SessionExpired);
        };

        self.session.replace_access_token(&token).await;
        info!("Access token refreshed");
        Ok(token)
    }

    async fn dispatch(&self, request: &ApiRequest) -> GatewayResult<Reply> {
        let body = request.encoded_body()?;
        let request_id = Uuid::new_v4().to_string();
        let token = self.session.access_token().await;

        let response = self
            .execute(request, body.clone(), token.as_deref(), &request_id)
            .await?;

        if response.status == 401 && !request.is_auth_endpoint() {
            debug!(
                request_id = %request_id,
                url = %mask_url_query(&request.url),
                "Access token rejected, refreshing"
            );
            let fresh = self
                .refresh_after_unauthorized(token.as_deref(), &request.url)
                .await?;
            let retried = self
                .execute(request, body, Some(&fresh), &request_id)
                .await?;
            return normalize(retried);
        }

        normalize(response)
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        body: Option<String>,
        token: Option<&str>,
        request_id: &str,
    ) -> GatewayResult<RawResponse> {
        let mut http = HttpRequest::new(request.method, request.url.as_str())
            .with_header("Content-Type", "application/json")
            .with_header(REQUEST_ID_HEADER, request_id);
        if let Some(token) = token {
            http = http.with_header("Authorization", format!("Bearer {}", token));
        }
        http.query = request.query.clone();
        http.body = body;

        let response = self.transport.execute(http).await?;
        debug!(
            request_id = %request_id,
            method = %request.method,
            url = %mask_url_query(&request.url),
            status = response.status,
            "Request completed"
        );
        Ok(response)
    }

    async fn refresh_after_unauthorized(
        &self,
        rejected: Option<&str>,
        url: &str,
    ) -> GatewayResult<String> {
        match self.refresh_policy {
            RefreshPolicy::Independent => {
                let result = self.request_refresh().await;
                self.expire_on_failure(result, url).await
            }
            RefreshPolicy::SingleFlight => {
                // Held until the session is marked, so waiters see the outcome
                let _guard = self.refresh_lock.lock().await;

                if self.session.state().await == SessionState::Expired {
                    return self.expire_on_failure(Err(GatewayError::SessionExpired), url).await;
                }
                if let Some(current) = self.session.access_token().await {
                    if rejected != Some(current.as_str()) {
                        debug!("Reusing token refreshed by a concurrent request");
                        return Ok(current);
                    }
                }
                let result = self.request_refresh().await;
                self.expire_on_failure(result, url).await
            }
        }
    }

    async fn expire_on_failure(
        &self,
        result: GatewayResult<String>,
        url: &str,
    ) -> GatewayResult<String> {
        if let Err(GatewayError::SessionExpired) = &result {
            self.on_session_expired(url).await;
        }
        result
    }

    async fn on_session_expired(&self, url: &str) {
        let mark = self.session.mark_expired().await;
        let emit = match (self.refresh_policy, mark) {
            (_, ExpiryMark::Transitioned) => true,
            (RefreshPolicy::Independent, ExpiryMark::AlreadyExpired) => true,
            _ => false,
        };

        error!(
            url = %mask_url_query(url),
            signalled = emit,
            "Session expired"
        );
        if emit {
            self.session.signal().emit();
        }
    }
}

fn normalize(response: RawResponse) -> GatewayResult<Reply> {
    match response.status {
        206 => Ok(Reply::NeedsStep(PendingStep::from_body(parse_body(&response.body)?))),
        200..=299 => Ok(Reply::Success(parse_body(&response.body)?)),
        status => {
            let message = ErrorBody::parse(&response.body)
                .best_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status));
            Err(GatewayError::Status { status, message })
        }
    }
}

fn parse_body(body: &str) -> GatewayResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(body)?)
}

/// Decode a success body as `R`, unwrapping a `{status, data}` envelope
pub fn decode_body<R>(value: Value) -> GatewayResult<R>
where
    R: DeserializeOwned,
{
    let envelope: Envelope<R> = serde_json::from_value(value)?;
    Ok(envelope.into_data())
}
