//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{ErrorKind, GatewayError, SessionError, TransportError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl DomainError {
    /// Whether the failure means the user has to log in again
    pub fn is_session_expired(&self) -> bool {
        matches!(self, DomainError::Gateway(GatewayError::SessionExpired))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        DomainError::Validation {
            message: format!("Invalid fields: {}", fields.join(", ")),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type GatewayResult<T> = Result<T, GatewayError>;
