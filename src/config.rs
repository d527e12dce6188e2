//! Client configuration for the practice backend.
//!
//! Settings come from defaults, then environment variables, then explicit
//! builder calls (the CLI applies its flags through the builders).

use std::time::Duration;
use thiserror::Error;

use crate::workspace::DEFAULT_LANGUAGE_ID;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the backend client and workspace defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base_url: String,
    /// Bearer token used for submit, analyze and auth sync.
    pub auth_token: Option<String>,
    /// Request timeout. `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    /// Language selected when a workspace opens.
    pub default_language_id: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            auth_token: None,
            request_timeout: None,
            default_language_id: DEFAULT_LANGUAGE_ID,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PRACTICE_API_BASE_URL`: Backend base URL (required)
    /// - `PRACTICE_AUTH_TOKEN`: Bearer token (optional)
    /// - `PRACTICE_HTTP_TIMEOUT_SECS`: Request timeout in seconds (optional)
    /// - `PRACTICE_DEFAULT_LANGUAGE_ID`: Initial language id (default: 71)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or have invalid values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.api_base_url = std::env::var("PRACTICE_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("PRACTICE_API_BASE_URL".to_string()))?;

        if let Ok(val) = std::env::var("PRACTICE_AUTH_TOKEN") {
            if !val.trim().is_empty() {
                config.auth_token = Some(val.trim().to_string());
            }
        }

        if let Ok(val) = std::env::var("PRACTICE_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "PRACTICE_HTTP_TIMEOUT_SECS")?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(val) = std::env::var("PRACTICE_DEFAULT_LANGUAGE_ID") {
            config.default_language_id = parse_env_value(&val, "PRACTICE_DEFAULT_LANGUAGE_ID")?;
        }

        config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base_url cannot be empty".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationFailed(format!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            )));
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::ValidationFailed(
                    "request_timeout must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Builder method to set the backend base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self.normalized()
    }

    /// Builder method to set the bearer token.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builder method to set the initial language.
    pub fn with_default_language_id(mut self, language_id: u32) -> Self {
        self.default_language_id = language_id;
        self
    }

    fn normalized(mut self) -> Self {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        self
    }
}

/// Parses an environment variable value into the specified type.
fn parse_env_value<T: std::str::FromStr>(val: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    val.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_language_id, 71);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig::new().with_api_base_url("https://api.example.com/v1/ ");
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = ClientConfig::new().with_api_base_url("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));

        let config = ClientConfig::new().with_api_base_url("ftp://example.com");
        assert!(config.validate().is_err());

        let config = ClientConfig::new().with_request_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let config = ClientConfig::new().with_auth_token(Some("  ".to_string()));
        assert!(config.auth_token.is_none());

        let config = ClientConfig::new().with_auth_token(Some("tok".to_string()));
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_parse_env_value_reports_key() {
        let err = parse_env_value::<u64>("abc", "PRACTICE_HTTP_TIMEOUT_SECS")
            .expect_err("should fail to parse");
        assert!(err.to_string().contains("PRACTICE_HTTP_TIMEOUT_SECS"));
    }
}
