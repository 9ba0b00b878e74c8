use payloads::{APIClient, ClientError, REQUEST_TIMEOUT};
use std::time::Duration;

/// Base URL of the teams API, e.g. `https://api.example.com`.
pub const API_URL: &str = "API_URL";
/// Optional request timeout override in milliseconds.
pub const API_TIMEOUT_MS: &str = "API_TIMEOUT_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("API_TIMEOUT_MS must be a number of milliseconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Where the app finds its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Environment {
    /// Read the process environment.
    ///
    /// `.env` files are not loaded here; binaries that want one call
    /// `dotenvy::dotenv()` before this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL))?;
        let request_timeout = match lookup(API_TIMEOUT_MS) {
            Some(ms) => ms
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTimeout(ms))?,
            None => REQUEST_TIMEOUT,
        };
        Ok(Self {
            api_url,
            request_timeout,
        })
    }

    pub fn api_client(&self) -> Result<APIClient, ClientError> {
        APIClient::with_timeout(&self.api_url, self.request_timeout)
    }
}
