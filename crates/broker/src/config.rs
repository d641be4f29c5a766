//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BrokerError, BrokerResult};

/// Environment variable holding the broker base URL.
pub const URL_ENV: &str = "CONTEXT_BROKER_URL";
/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "CONTEXT_BROKER_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:1026";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where the broker lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Base URL; a trailing `/` is ignored.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request deadline enforced by the HTTP transport.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

impl BrokerConfig {
    /// Loads defaults overridden by [`URL_ENV`] and [`TIMEOUT_ENV`].
    pub fn from_env() -> BrokerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BrokerResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(URL_ENV).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            config.request_timeout_ms = raw.parse().map_err(|_| {
                BrokerError::Config(format!("{TIMEOUT_ENV} must be an integer, got '{raw}'"))
            })?;
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
