//! Telemetry API configuration.

use std::time::Duration;

/// Address of a locally running telemetry API.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the API base address.
pub const BASE_URL_ENV: &str = "FLOOD_API_BASE_URL";

/// Upper bound on a single fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base address; endpoint paths are appended to it
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base address taken from `FLOOD_API_BASE_URL` when set.
    pub fn from_env() -> Self {
        Self::from_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn from_base_url(base_url: Option<String>) -> Self {
        match base_url.map(|s| s.trim().to_string()) {
            Some(url) if !url.is_empty() => Self {
                base_url: url,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
