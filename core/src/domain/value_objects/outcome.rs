//! Normalized results of gateway calls and of the auth flows built on them.

use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::session::Session;
use crate::errors::ErrorKind;

/// Body fields that carry the continuation credential of a 206 answer
const CONTINUATION_FIELDS: [&str; 3] = ["pre_auth_token", "pre_reg_token", "continuation_token"];

/// An extra step the server asked for (HTTP 206), typically an OTP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingStep {
    /// Human-readable instruction from the server
    pub message: String,

    /// Intermediate credential to send with the next step
    pub continuation_token: Option<String>,

    /// Body exactly as received
    pub body: Value,
}

impl PendingStep {
    /// Build from a 206 body without altering it
    pub fn from_body(body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let continuation_token = CONTINUATION_FIELDS
            .iter()
            .find_map(|field| body.get(*field).and_then(Value::as_str))
            .map(str::to_string);

        Self {
            message,
            continuation_token,
            body,
        }
    }
}

/// Result of a gateway call that did not fail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiOutcome {
    /// 2xx (other than 206); an empty body is `{}`
    Success(Value),

    /// 206: the caller has to complete another step
    NeedsStep(PendingStep),

    /// A best-effort call failed and the failure was swallowed
    Suppressed { kind: ErrorKind, message: String },
}

impl ApiOutcome {
    /// Body of a successful call
    pub fn success(&self) -> Option<&Value> {
        match self {
            ApiOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, ApiOutcome::Suppressed { .. })
    }

    /// The pending step of a 206 answer
    pub fn pending_step(&self) -> Option<&PendingStep> {
        match self {
            ApiOutcome::NeedsStep(step) => Some(step),
            _ => None,
        }
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Credentials accepted; the session is established
    Authenticated(Session),
    /// The server wants an OTP before issuing a token
    OtpRequired(PendingStep),
}

/// Result of a registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// Account created
    Completed { message: String },
    /// The server wants the emailed OTP before creating the account
    OtpRequired(PendingStep),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_step_keeps_body() {
        let body = json!({"message": "OTP sent", "pre_auth_token": "pre-1", "extra": [1, 2]});
        let step = PendingStep::from_body(body.clone());
        assert_eq!(step.message, "OTP sent");
        assert_eq!(step.continuation_token.as_deref(), Some("pre-1"));
        assert_eq!(step.body, body);
    }

    #[test]
    fn test_pending_step_registration_token() {
        let step = PendingStep::from_body(json!({"message": "Check mail", "pre_reg_token": "r-9"}));
        assert_eq!(step.continuation_token.as_deref(), Some("r-9"));
    }

    #[test]
    fn test_pending_step_without_fields() {
        let step = PendingStep::from_body(json!({}));
        assert_eq!(step.message, "");
        assert!(step.continuation_token.is_none());
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = ApiOutcome::Success(json!({"a": 1}));
        assert!(outcome.is_success());
        assert_eq!(outcome.success(), Some(&json!({"a": 1})));
        assert!(outcome.pending_step().is_none());

        let suppressed = ApiOutcome::Suppressed {
            kind: ErrorKind::SessionExpired,
            message: "Session expired.".into(),
        };
        assert!(suppressed.is_suppressed());
    }
}
