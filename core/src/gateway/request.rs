//! Per-call request description

use serde::Serialize;
use serde_json::Value;

use super::transport::HttpMethod;
use crate::errors::GatewayError;

/// Paths whose 401 means "wrong credentials", not "stale token"
pub(crate) const AUTH_PATHS: [&str; 5] = [
    "/login",
    "/login/verify-otp",
    "/register",
    "/register/start",
    "/register/verify",
];

/// A request as issued by a service client
///
/// Headers are not part of it: the gateway computes them on every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Swallow failures instead of returning them
    pub best_effort: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            best_effort: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Serialize `body` as the JSON payload
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, GatewayError> {
        let value =
            serde_json::to_value(body).map_err(|e| GatewayError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Mark the call best-effort
    pub fn best_effort(mut self) -> Self {
        self.best_effort = true;
        self
    }

    pub(crate) fn encoded_body(&self) -> Result<Option<String>, GatewayError> {
        self.body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| GatewayError::Encode(e.to_string()))
    }

    /// Whether the target is a login or registration endpoint
    pub fn is_auth_endpoint(&self) -> bool {
        let path = url_path(&self.url);
        AUTH_PATHS.iter().any(|auth| path.ends_with(auth))
    }
}

/// Path component of an absolute or relative URL, without query or fragment
fn url_path(url: &str) -> &str {
    let url = url.split(&['?', '#'][..]).next().unwrap_or(url);
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    match after_scheme.find('/') {
        Some(index) if url.contains("://") => after_scheme[index..].trim_end_matches('/'),
        Some(_) => after_scheme.trim_end_matches('/'),
        None if url.contains("://") => "",
        None => after_scheme,
    }
}

/// Percent-encode a value used as one URL path segment
pub fn path_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
