//! Session store (Redis) configuration

use serde::{Deserialize, Serialize};

/// Redis configuration for the session store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every session key
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Maximum attempts for a single Redis operation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts in milliseconds (doubled on each retry)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Response timeout in seconds
    #[serde(default = "default_response_timeout")]
    pub response_timeout: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            response_timeout: default_response_timeout(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    ///
    /// Returns `None` when `REDIS_URL` is unset or empty, which selects the
    /// stateless (no revocation) deployment mode.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup, falling back to defaults for unset or
    /// unparsable values
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = var("REDIS_URL").filter(|url| !url.trim().is_empty())?;
        let key_prefix = var("REDIS_KEY_PREFIX").filter(|prefix| !prefix.is_empty());
        let max_retries = var("REDIS_MAX_RETRIES")
            .and_then(|v| v.parse::<u32>().ok())
            .map(|v| v.max(1))
            .unwrap_or_else(default_max_retries);
        let retry_delay_ms = var("REDIS_RETRY_DELAY_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_retry_delay_ms);
        let response_timeout = var("REDIS_RESPONSE_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(default_response_timeout);

        Some(Self {
            url,
            key_prefix,
            max_retries,
            retry_delay_ms,
            response_timeout,
        })
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all session keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the retry policy
    pub fn with_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_response_timeout() -> u64 {
    5
}
