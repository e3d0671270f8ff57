//! Client configuration
//!
//! Credentials and connection settings for the Basin platform API,
//! loadable from the environment or built programmatically.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use std::time::Duration;
use url::Url;

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.basin-ml.com";

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "BASIN_API_URL";

/// Environment variable holding the bearer token
pub const ENV_AUTH_TOKEN: &str = "BASIN_AUTH_TOKEN";

/// Environment variable holding the organization id
pub const ENV_ORGANIZATION_ID: &str = "BASIN_ORGANIZATION_ID";

/// Configuration for a platform client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all API requests
    pub api_url: String,
    /// Bearer token used for authentication
    pub auth_token: String,
    /// Organization every resource path is scoped under
    pub organization_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of transport retries
    pub max_retries: u32,
    /// Backoff strategy between retries
    pub backoff_type: BackoffType,
    /// Initial backoff delay
    pub initial_backoff: Duration,
    /// Maximum backoff delay
    pub max_backoff: Duration,
}

impl ClientConfig {
    /// Create a config with the default endpoint
    pub fn new(auth_token: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: auth_token.into(),
            organization_id: organization_id.into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff_type: BackoffType::Exponential,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
        }
    }

    /// Load configuration from the environment
    ///
    /// Reads `BASIN_AUTH_TOKEN` and `BASIN_ORGANIZATION_ID` (required) and
    /// `BASIN_API_URL` (optional, defaults to the public endpoint).
    pub fn from_env() -> Result<Self> {
        let auth_token = require_env(ENV_AUTH_TOKEN)?;
        let organization_id = require_env(ENV_ORGANIZATION_ID)?;
        let mut config = Self::new(auth_token, organization_id);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override retry behaviour
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override backoff behaviour
    #[must_use]
    pub fn with_backoff(
        mut self,
        backoff_type: BackoffType,
        initial: Duration,
        max: Duration,
    ) -> Self {
        self.backoff_type = backoff_type;
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)?;
        if self.auth_token.is_empty() {
            return Err(Error::config("auth token must not be empty"));
        }
        if self.organization_id.is_empty() {
            return Err(Error::config("organization id must not be empty"));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::missing_env(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("token", "org-1");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("token", "org-1")
            .with_api_url("https://staging.basin-ml.com")
            .with_timeout(Duration::from_secs(5))
            .with_retries(0);
        assert_eq!(config.api_url, "https://staging.basin-ml.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig::new("token", "org-1").with_api_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = ClientConfig::new("", "org-1");
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Config { .. }
        ));
    }
}
