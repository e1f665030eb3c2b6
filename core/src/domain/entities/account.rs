//! Account and credential exchange bodies of the user service

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use ms_shared::Role;

/// Answer to a CAPTCHA challenge, attached to login or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaAnswer {
    pub captcha_id: String,
    pub answer: String,
}

/// A CAPTCHA challenge as served by `GET /captcha/new`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captcha {
    pub captcha_id: String,
    /// Image payload (data URL or base64), passed through untouched
    pub image: String,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_answer: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha_id: None,
            captcha_answer: None,
        }
    }

    /// Attach a CAPTCHA answer
    pub fn with_captcha(mut self, captcha: Option<CaptchaAnswer>) -> Self {
        if let Some(captcha) = captcha {
            self.captcha_id = Some(captcha.captcha_id);
            self.captcha_answer = Some(captcha.answer);
        }
        self
    }
}

/// Body of `POST /register` and `POST /register/start`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    /// Requested role; only buyer and seller accounts can be self-registered
    #[validate(custom = "validate_self_assignable")]
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_answer: Option<String>,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
            role,
            captcha_id: None,
            captcha_answer: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach a CAPTCHA answer
    pub fn with_captcha(mut self, captcha: Option<CaptchaAnswer>) -> Self {
        if let Some(captcha) = captcha {
            self.captcha_id = Some(captcha.captcha_id);
            self.captcha_answer = Some(captcha.answer);
        }
        self
    }
}

fn validate_self_assignable(role: &Role) -> Result<(), ValidationError> {
    if role.is_self_assignable() {
        Ok(())
    } else {
        Err(ValidationError::new("role_not_self_assignable"))
    }
}

/// Body of `POST /login/verify-otp`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginOtpRequest {
    #[validate(length(min = 1))]
    pub pre_auth_token: String,

    #[validate(length(min = 1, max = 12))]
    pub otp_code: String,
}

/// Body of `POST /register/verify`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationOtpRequest {
    #[validate(length(min = 1))]
    pub pre_reg_token: String,

    #[validate(length(min = 1, max = 12))]
    pub otp_code: String,
}

/// Successful login answer: `{username, access_token}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub username: String,
    pub access_token: String,
}

/// Answer of `POST /refresh`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshGrant {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl RefreshGrant {
    /// The new access token, if the service actually issued one
    pub fn into_token(self) -> Option<String> {
        self.access_token.filter(|token| !token.is_empty())
    }
}

/// Account as listed by the admin endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    #[serde(default)]
    pub role: Role,
}
