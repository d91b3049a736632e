//! Authentication configuration

use serde::{Deserialize, Serialize};

const DEFAULT_ACCESS_SECRET: &str = "development-access-secret-change-in-production";
const DEFAULT_REFRESH_SECRET: &str = "development-refresh-secret-change-in-production";

/// JWT signing configuration
///
/// Access and refresh tokens are signed with separate HMAC secrets so that a
/// token of one kind can never be accepted as the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Secret used to sign refresh tokens
    pub refresh_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEFAULT_ACCESS_SECRET),
            refresh_secret: String::from(DEFAULT_REFRESH_SECRET),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with both signing secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            access_secret: std::env::var("JWT_ACCESS_SECRET").unwrap_or(defaults.access_secret),
            refresh_secret: std::env::var("JWT_REFRESH_SECRET").unwrap_or(defaults.refresh_secret),
            access_token_expiry: std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expiry),
            refresh_token_expiry: std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expiry),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if either secret is still the built-in development value
    pub fn is_using_default_secrets(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET || self.refresh_secret == DEFAULT_REFRESH_SECRET
    }
}

/// Credentials of the single account accepted by the login endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginConfig {
    /// Username expected at login
    pub username: String,

    /// Password expected at login
    #[serde(skip_serializing)]
    pub password: String,

    /// Subject identifier issued to the account
    pub subject: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            username: String::from("username"),
            password: String::from("password"),
            subject: String::from("testuser"),
        }
    }
}

impl LoginConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            username: std::env::var("AUTH_USERNAME").unwrap_or(defaults.username),
            password: std::env::var("AUTH_PASSWORD").unwrap_or(defaults.password),
            subject: std::env::var("AUTH_SUBJECT").unwrap_or(defaults.subject),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Login account configuration
    #[serde(default)]
    pub login: LoginConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            login: LoginConfig::from_env(),
        }
    }
}

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_refresh_token_expiry() -> i64 {
    604800 // 7 days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_ne!(config.access_secret, config.refresh_secret);
        assert!(config.is_using_default_secrets());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("access", "refresh")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secrets());
    }

    #[test]
    fn test_login_password_is_not_serialized() {
        let json = serde_json::to_value(LoginConfig::default()).unwrap();
        assert_eq!(json["username"], "username");
        assert!(json.get("password").is_none());
    }
}
