//! Error types for the request pipeline and session handling
//!
//! Every failure a caller can observe falls into one of the gateway kinds:
//! transport failure, non-2xx status with server message, expired session,
//! or an unparseable body.

use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::session::SessionState;

/// Failures raised by an `HttpTransport` before any status was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Transport failure: {0}")]
    Other(String),
}

/// Coarse classification of a gateway failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Status,
    SessionExpired,
    Parse,
    Encode,
}

/// Errors returned by the authenticated request gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response; `message` is the server's text or a generic one
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Session expired.")]
    SessionExpired,

    #[error("Invalid response body: {0}")]
    Parse(String),

    #[error("Invalid request body: {0}")]
    Encode(String),
}

impl GatewayError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport(_) => ErrorKind::Transport,
            GatewayError::Status { .. } => ErrorKind::Status,
            GatewayError::SessionExpired => ErrorKind::SessionExpired,
            GatewayError::Parse(_) => ErrorKind::Parse,
            GatewayError::Encode(_) => ErrorKind::Encode,
        }
    }

    /// Error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Transport(TransportError::Timeout) => "REQUEST_TIMEOUT",
            GatewayError::Transport(_) => "NETWORK_ERROR",
            GatewayError::Status { status: 401, .. } => "UNAUTHORIZED",
            GatewayError::Status { status: 403, .. } => "FORBIDDEN",
            GatewayError::Status { status: 404, .. } => "NOT_FOUND",
            GatewayError::Status { status: 409, .. } => "CONFLICT",
            GatewayError::Status { status: 429, .. } => "RATE_LIMITED",
            GatewayError::Status { status, .. } if *status >= 500 => "SERVER_ERROR",
            GatewayError::Status { .. } => "REQUEST_REJECTED",
            GatewayError::SessionExpired => "SESSION_EXPIRED",
            GatewayError::Parse(_) => "INVALID_RESPONSE",
            GatewayError::Encode(_) => "INVALID_REQUEST",
        }
    }

    /// HTTP status when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session can no longer be trusted
    pub fn is_session_expired(&self) -> bool {
        matches!(self, GatewayError::SessionExpired)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Parse(err.to_string())
    }
}

/// Errors raised by the session context and credential stores
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("No active session")]
    NotAuthenticated,

    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    #[error("Credential store error: {0}")]
    Store(String),
}
