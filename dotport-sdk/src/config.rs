//! SDK configuration.

use std::time::Duration;

use crate::error::{PortalError, PortalResult};

/// Configuration for the portal client.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the data service (e.g. `http://localhost:5000/api`)
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum automatic retries for transient failures
    pub max_retries: u32,

    /// Initial backoff before the first retry
    pub retry_initial_backoff: Duration,

    /// Ceiling for the doubled backoff
    pub retry_max_backoff: Duration,

    /// User agent header sent with every request
    pub user_agent: String,

    /// Log requests and response bodies at debug level
    pub enable_logging: bool,

    /// Snapshot freshness window; zero keeps snapshots until invalidated
    pub cache_ttl: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_initial_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_secs(30),
            user_agent: format!("dotport-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl PortalConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the maximum number of automatic retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial retry backoff.
    pub fn with_retry_initial_backoff(mut self, backoff: Duration) -> Self {
        self.retry_initial_backoff = backoff;
        self
    }

    /// Set the retry backoff ceiling.
    pub fn with_retry_max_backoff(mut self, backoff: Duration) -> Self {
        self.retry_max_backoff = backoff;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Set the snapshot freshness window. `Duration::ZERO` disables expiry.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PortalResult<()> {
        if self.base_url.is_empty() {
            return Err(PortalError::Configuration("base_url cannot be empty".to_string()));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| PortalError::Configuration(format!("invalid base_url: {}", e)))?;

        if self.timeout.is_zero() {
            return Err(PortalError::Configuration("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_builder_methods() {
        let config = PortalConfig::new("https://data.transportation.example.com/api")
            .with_timeout(Duration::from_secs(60))
            .with_max_retries(5)
            .with_logging(true)
            .with_cache_ttl(Duration::ZERO);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert!(config.enable_logging);
        assert!(config.cache_ttl.is_zero());
    }

    #[test]
    fn test_validate() {
        assert!(PortalConfig::default().validate().is_ok());

        let empty = PortalConfig::new("");
        assert!(empty.validate().is_err());

        let invalid = PortalConfig::new("not a url");
        assert!(invalid.validate().is_err());

        let zero_timeout = PortalConfig::default().with_timeout(Duration::ZERO);
        assert!(zero_timeout.validate().is_err());
    }
}
