//! Configuration module with concern-specific sub-modules
//!
//! - `auth` - Session lifetime, refresh coordination and login flow variants
//! - `endpoints` - Base URLs of the shop microservices
//! - `environment` - Environment detection and logging configuration
//! - `http` - Outbound HTTP client settings

pub mod auth;
pub mod endpoints;
pub mod environment;
pub mod http;

use serde::{Deserialize, Serialize};

pub use auth::{AuthFlowConfig, RefreshPolicy, SessionConfig};
pub use endpoints::ServiceEndpoints;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use http::HttpConfig;

/// Complete client configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Service base URLs
    #[serde(default)]
    pub endpoints: ServiceEndpoints,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Login/registration flow variant
    #[serde(default)]
    pub auth: AuthFlowConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            endpoints: ServiceEndpoints::default(),
            http: HttpConfig::default(),
            session: SessionConfig::default(),
            auth: AuthFlowConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl ClientConfig {
    /// Configuration for local development against services on 127.0.0.1
    pub fn development() -> Self {
        Self::default()
    }

    /// Configuration for a production deployment behind one gateway URL
    pub fn production(base_url: impl Into<String>) -> Self {
        Self {
            environment: Environment::Production,
            endpoints: ServiceEndpoints::single(base_url),
            http: HttpConfig::default().with_request_timeout(15),
            session: SessionConfig::default(),
            auth: AuthFlowConfig {
                staged_registration: true,
                captcha_enabled: true,
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Environment-selected defaults, before any file or variable overrides
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = Self::development();
        config.environment = env;
        config.logging = LoggingConfig::for_environment(env);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert!(config.environment.is_development());
        assert_eq!(config.endpoints.product, "http://127.0.0.1:5002");
        assert!(!config.auth.staged_registration);
    }

    #[test]
    fn test_production_config() {
        let config = ClientConfig::production("https://shop.example.com");
        assert!(config.environment.is_production());
        assert_eq!(config.endpoints.user, "https://shop.example.com");
        assert_eq!(config.http.request_timeout_secs, 15);
        assert!(config.auth.captcha_enabled);
    }

    #[test]
    fn test_deserialize_empty_document() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.endpoints, ServiceEndpoints::default());
        assert_eq!(config.session.inactivity_timeout_secs, 900);
    }
}
