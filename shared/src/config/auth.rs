//! Session and authentication flow configuration

use serde::{Deserialize, Serialize};

/// How concurrent requests that hit an expired access token refresh it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every request that observes a 401 refreshes on its own
    #[default]
    Independent,
    /// Refreshes are serialised; a caller that waited reuses the token a
    /// concurrent caller already obtained
    SingleFlight,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Idle time in seconds after which the session is logged out (0 disables)
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_secs: u64,

    /// How often the inactivity monitor checks, in seconds
    #[serde(default = "default_inactivity_check_interval")]
    pub inactivity_check_interval_secs: u64,

    /// Refresh coordination between concurrent requests
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Name of the cookie holding the refresh token
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,

    /// Path of the file used to persist credentials between runs
    #[serde(default)]
    pub credentials_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_timeout(),
            inactivity_check_interval_secs: default_inactivity_check_interval(),
            refresh_policy: RefreshPolicy::default(),
            refresh_cookie_name: default_refresh_cookie(),
            credentials_path: None,
        }
    }
}

impl SessionConfig {
    /// Whether the inactivity timeout is enabled
    pub fn inactivity_enabled(&self) -> bool {
        self.inactivity_timeout_secs > 0
    }

    /// Set the inactivity timeout in minutes
    pub fn with_inactivity_minutes(mut self, minutes: u64) -> Self {
        self.inactivity_timeout_secs = minutes * 60;
        self
    }
}

/// Which variant of the login/registration flow the user service exposes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthFlowConfig {
    /// Registration goes through `/register/start` + `/register/verify`
    #[serde(default)]
    pub staged_registration: bool,

    /// Fetch a CAPTCHA before login and registration
    #[serde(default)]
    pub captcha_enabled: bool,
}

impl Default for AuthFlowConfig {
    fn default() -> Self {
        Self {
            staged_registration: false,
            captcha_enabled: false,
        }
    }
}

fn default_inactivity_timeout() -> u64 {
    900 // 15 minutes
}

fn default_inactivity_check_interval() -> u64 {
    30
}

fn default_refresh_cookie() -> String {
    String::from("refresh_token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.inactivity_timeout_secs, 900);
        assert_eq!(config.refresh_policy, RefreshPolicy::Independent);
        assert_eq!(config.refresh_cookie_name, "refresh_token");
        assert!(config.inactivity_enabled());
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::default().with_inactivity_minutes(0);
        assert!(!config.inactivity_enabled());
    }

    #[test]
    fn test_refresh_policy_serde() {
        let policy: RefreshPolicy = serde_json::from_str(r#""single_flight""#).unwrap();
        assert_eq!(policy, RefreshPolicy::SingleFlight);
    }
}
