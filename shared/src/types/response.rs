//! Response body shapes returned by the shop services

use serde::{Deserialize, Serialize};

/// Body of a resource response
///
/// Newer services wrap their payload as `{"status": ..., "data": ...}` while
/// older ones return the payload directly. Both decode into the same `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{status, data}` wrapper
    Wrapped {
        /// Service-reported status word
        status: String,
        /// Wrapped payload
        data: T,
    },
    /// Bare payload
    Raw(T),
}

impl<T> Envelope<T> {
    /// Extract the payload regardless of the wire shape
    pub fn into_data(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Raw(data) => data,
        }
    }

    /// Status word when the body was wrapped
    pub fn status(&self) -> Option<&str> {
        match self {
            Envelope::Wrapped { status, .. } => Some(status),
            Envelope::Raw(_) => None,
        }
    }
}

/// Error body the services send with non-2xx statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,

    /// Machine-readable reason (payment service)
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body leniently; malformed bodies yield an empty value
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Server-provided message, falling back to the reason code
    pub fn best_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.error.as_deref().filter(|e| !e.is_empty()))
    }
}

/// Plain `{message}` acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Acknowledgement text
    #[serde(default)]
    pub message: String,
}
