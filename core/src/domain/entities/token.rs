//! Access token claims as read by the client.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use ms_shared::Role;

use crate::errors::SessionError;

/// Claims the user service puts into access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (username)
    pub sub: String,

    /// Account role; absent on tokens from older user services
    #[serde(default)]
    pub role: Option<String>,

    /// Expiration timestamp (seconds since epoch)
    #[serde(default)]
    pub exp: Option<i64>,

    /// Token type (`access` or `refresh`)
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
}

impl AccessClaims {
    /// Decodes the claims of a token without verifying its signature
    ///
    /// The client never holds the signing secret; the claims are only used
    /// to pick the dashboard and to drop tokens that are already expired.
    /// The services verify every token they receive.
    pub fn decode_unverified(token: &str) -> Result<Self, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| SessionError::MalformedToken(e.to_string()))
    }

    /// Role claim, defaulting to buyer
    pub fn role(&self) -> Role {
        Role::from_claim(self.role.as_deref())
    }

    /// Whether the token is expired at `now`; tokens without `exp` never are
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.map_or(false, |exp| exp <= now.timestamp())
    }
}
