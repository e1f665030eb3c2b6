//! Infrastructure error type

use ms_core::errors::SessionError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// HTTP client construction or request error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration sources could not be merged or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl From<InfraError> for SessionError {
    fn from(err: InfraError) -> Self {
        SessionError::Store(err.to_string())
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
