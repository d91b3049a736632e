//! Single-account credential verifier

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use tessera_shared::config::LoginConfig;
use tracing::debug;

use crate::errors::{AuthError, DomainError};

use super::traits::CredentialVerifier;

/// Accepts exactly one configured username/password pair
pub struct StaticCredentialVerifier {
    username: String,
    password: String,
    subject: String,
}

impl StaticCredentialVerifier {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            subject: subject.into(),
        }
    }
}

impl From<&LoginConfig> for StaticCredentialVerifier {
    fn from(config: &LoginConfig) -> Self {
        Self::new(&config.username, &config.password, &config.subject)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, DomainError> {
        // Compare both fields in constant time and only then combine
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());

        if username_ok & password_ok {
            Ok(self.subject.clone())
        } else {
            debug!("Login rejected");
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
