//! Runtime configuration loaded from environment variables.
//!
//! | Variable                        | Default | Notes                                 |
//! |---------------------------------|---------|---------------------------------------|
//! | `STOREFRONT_POLL_INTERVAL_MS`   | 5000    | order poll period, must be > 0        |
//! | `STOREFRONT_API_URL`            | unset   | required by the HTTP gateway only     |
//! | `STOREFRONT_API_TOKEN`          | unset   | bearer token for authenticated calls  |
//! | `STOREFRONT_REQUEST_TIMEOUT_MS` | 10000   | per-request timeout, must be > 0      |

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const POLL_INTERVAL_VAR: &str = "STOREFRONT_POLL_INTERVAL_MS";
pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
pub const API_TOKEN_VAR: &str = "STOREFRONT_API_TOKEN";
pub const REQUEST_TIMEOUT_VAR: &str = "STOREFRONT_REQUEST_TIMEOUT_MS";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sync core configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Period of the order poll
    pub poll_interval: Duration,
    /// Root of the storefront API
    pub api_url: Option<Url>,
    /// Bearer token of the signed-in customer
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            api_url: None,
            api_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key/value source. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let poll_interval = match get(POLL_INTERVAL_VAR) {
            Some(raw) => parse_millis(POLL_INTERVAL_VAR, &raw)?,
            None => DEFAULT_POLL_INTERVAL,
        };
        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => parse_millis(REQUEST_TIMEOUT_VAR, &raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        let api_url = get(API_URL_VAR)
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| ConfigError::InvalidEnvVar(API_URL_VAR.to_string(), e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            poll_interval,
            api_url,
            api_token: get(API_TOKEN_VAR),
            request_timeout,
        })
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let millis = raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}
