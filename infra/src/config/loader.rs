use std::path::PathBuf;

use ::config::{Config, Environment as EnvSource, File};
use tracing::{debug, info};

use ms_shared::ClientConfig;

use crate::error::InfraResult;

const BASE_FILE: &str = "micro-shop.toml";
const ENV_PREFIX: &str = "MICRO_SHOP";
const SEPARATOR: &str = "__";

/// Builder for the client configuration
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: Option<String>,
    load_dotenv: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: Some(ENV_PREFIX.to_string()),
            load_dotenv: true,
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file (required) instead of the default file lookup
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Prefix of the overriding variables; `None` ignores the environment
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    /// Skip reading `.env`
    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    /// Merge every source into a `ClientConfig`
    pub fn load(&self) -> InfraResult<ClientConfig> {
        if self.load_dotenv {
            if let Ok(path) = dotenvy::dotenv() {
                debug!(path = %path.display(), "Loaded .env file");
            }
        }

        let defaults = ClientConfig::from_env();
        let environment = defaults.environment;
        let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);

        builder = match &self.file {
            Some(path) => builder.add_source(File::from(path.clone()).required(true)),
            None => builder
                .add_source(File::from(PathBuf::from(BASE_FILE)).required(false))
                .add_source(
                    File::from(PathBuf::from(environment.config_file())).required(false),
                ),
        };

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                EnvSource::with_prefix(prefix)
                    .prefix_separator(SEPARATOR)
                    .separator(SEPARATOR)
                    .try_parsing(true),
            );
        }

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        info!(
            environment = %config.environment,
            user_service = %config.endpoints.user,
            refresh_policy = ?config.session.refresh_policy,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_shared::RefreshPolicy;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ms-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ConfigLoader::new()
            .with_env_prefix(None)
            .without_dotenv()
            .load()
            .unwrap();
        assert_eq!(config.endpoints.cart, "http://127.0.0.1:5004");
        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.session.refresh_policy, RefreshPolicy::Independent);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = temp_file(
            r#"
[endpoints]
user = "https://auth.shop.test"

[session]
refresh_policy = "single_flight"
inactivity_timeout_secs = 60

[auth]
captcha_enabled = true
"#,
        );

        let config = ConfigLoader::new()
            .with_file(&path)
            .with_env_prefix(None)
            .without_dotenv()
            .load()
            .unwrap();
        assert_eq!(config.endpoints.user, "https://auth.shop.test");
        assert_eq!(config.endpoints.product, "http://127.0.0.1:5002");
        assert_eq!(config.session.refresh_policy, RefreshPolicy::SingleFlight);
        assert_eq!(config.session.inactivity_timeout_secs, 60);
        assert!(config.auth.captcha_enabled);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = ConfigLoader::new()
            .with_file("/nonexistent/micro-shop.toml")
            .with_env_prefix(None)
            .without_dotenv()
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = temp_file("[http]\nrequest_timeout_secs = 10\n");
        std::env::set_var("MS_LOADER_TEST__HTTP__REQUEST_TIMEOUT_SECS", "3");

        let config = ConfigLoader::new()
            .with_file(&path)
            .with_env_prefix(Some("MS_LOADER_TEST"))
            .without_dotenv()
            .load()
            .unwrap();
        assert_eq!(config.http.request_timeout_secs, 3);

        std::env::remove_var("MS_LOADER_TEST__HTTP__REQUEST_TIMEOUT_SECS");
        std::fs::remove_file(path).unwrap();
    }
}
