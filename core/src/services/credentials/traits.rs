//! Trait for credential verification

use async_trait::async_trait;

use crate::errors::DomainError;

/// Checks a username/password pair and names the subject it belongs to
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the subject identifier for valid credentials
    ///
    /// # Returns
    /// * `Ok(subject)` - Credentials are valid
    /// * `Err(AuthError::InvalidCredentials)` - Unknown user or wrong password
    async fn check_credentials(&self, username: &str, password: &str)
        -> Result<String, DomainError>;
}
