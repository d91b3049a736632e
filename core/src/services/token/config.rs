//! Configuration for the token service

use chrono::TimeDelta;
use tessera_shared::config::JwtConfig;

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_SECONDS, REFRESH_TOKEN_EXPIRY_SECONDS};
use crate::errors::DomainError;

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC secret for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC secret for refresh tokens
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_seconds: i64,
}

impl TokenServiceConfig {
    /// Creates a configuration with the default lifetimes (1 hour / 7 days)
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_token_expiry_seconds: ACCESS_TOKEN_EXPIRY_SECONDS,
            refresh_token_expiry_seconds: REFRESH_TOKEN_EXPIRY_SECONDS,
        }
    }

    /// Overrides both token lifetimes
    pub fn with_expiry(mut self, access_seconds: i64, refresh_seconds: i64) -> Self {
        self.access_token_expiry_seconds = access_seconds;
        self.refresh_token_expiry_seconds = refresh_seconds;
        self
    }

    /// Checks the secrets and lifetimes before any key is built
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(DomainError::Validation {
                message: "signing secrets must not be empty".to_string(),
            });
        }
        if self.access_secret == self.refresh_secret {
            return Err(DomainError::Validation {
                message: "access and refresh tokens must use different secrets".to_string(),
            });
        }
        if self.access_token_expiry_seconds <= 0 || self.refresh_token_expiry_seconds <= 0 {
            return Err(DomainError::Validation {
                message: "token lifetimes must be positive".to_string(),
            });
        }
        if self.access_token_expiry_seconds > MAX_TOKEN_LIFETIME_SECONDS
            || self.refresh_token_expiry_seconds > MAX_TOKEN_LIFETIME_SECONDS
        {
            return Err(DomainError::Validation {
                message: format!(
                    "token lifetimes must not exceed {} seconds",
                    MAX_TOKEN_LIFETIME_SECONDS
                ),
            });
        }
        Ok(())
    }

    /// Access token lifetime as a `TimeDelta`
    pub fn access_ttl(&self) -> Result<TimeDelta, DomainError> {
        lifetime(self.access_token_expiry_seconds)
    }

    /// Refresh token lifetime as a `TimeDelta`
    pub fn refresh_ttl(&self) -> Result<TimeDelta, DomainError> {
        lifetime(self.refresh_token_expiry_seconds)
    }
}

fn lifetime(seconds: i64) -> Result<TimeDelta, DomainError> {
    TimeDelta::try_seconds(seconds).ok_or_else(|| DomainError::Validation {
        message: format!("token lifetime of {} seconds is out of range", seconds),
    })
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self::new(config.access_secret.as_bytes(), config.refresh_secret.as_bytes()).with_expiry(
            config.access_token_expiry,
            config.refresh_token_expiry,
        )
    }
}

// Secrets stay out of Debug output
impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_expiry_seconds", &self.access_token_expiry_seconds)
            .field("refresh_token_expiry_seconds", &self.refresh_token_expiry_seconds)
            .finish()
    }
}
