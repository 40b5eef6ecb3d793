//! Configuration for the `PagerDuty` connector.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// `PagerDuty` REST API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single [`crate::PagerDutyClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// REST API key sent as `Authorization: Token token=<key>`.
    pub api_key: String,
    /// Request timeout (default: 30 seconds).
    pub timeout: Option<Duration>,
    /// API base URL (default: `https://api.pagerduty.com`).
    pub base_url: Option<String>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub(crate) fn effective_timeout(&self) -> Duration {
        match self.timeout {
            Some(t) if !t.is_zero() => t,
            _ => DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

/// Process-level configuration for the activity worker binary.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// API key used when an activity input does not carry one.
    pub api_key: Option<String>,
    /// API base URL override.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Directory where document batches are written.
    pub store_dir: PathBuf,
}

impl ConnectorConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PAGERDUTY_API_KEY`
    /// - `PAGERDUTY_API_URL`
    /// - `PAGERDUTY_TIMEOUT_SECS` (default: 30)
    /// - `PAGERDUTY_STORE_DIR` (default: `./pagerduty-documents`)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("PAGERDUTY_API_KEY").ok().filter(|s| !s.is_empty()),
            base_url: env::var("PAGERDUTY_API_URL").ok().filter(|s| !s.is_empty()),
            timeout: env::var("PAGERDUTY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            store_dir: env::var("PAGERDUTY_STORE_DIR")
                .map_or_else(|_| PathBuf::from("./pagerduty-documents"), PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let cfg = ClientConfig::new("key");
        assert_eq!(cfg.effective_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.effective_base_url(), "https://api.pagerduty.com");
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let cfg = ClientConfig::new("key").with_timeout(Duration::ZERO);
        assert_eq!(cfg.effective_timeout(), DEFAULT_TIMEOUT);

        let cfg = ClientConfig::new("key").with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.effective_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_base_url_override() {
        let cfg = ClientConfig::new("key").with_base_url("http://127.0.0.1:9999");
        assert_eq!(cfg.effective_base_url(), "http://127.0.0.1:9999");
    }
}
