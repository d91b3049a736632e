//! Session store for deployments without revocation

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainError;

use super::SessionStore;

/// Session store that records nothing and treats every token as live
///
/// With this store a token stays valid until it expires: logout and rotation
/// cannot invalidate it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRevocation;

impl NoRevocation {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionStore for NoRevocation {
    async fn put(&self, _key: &str, _subject: &str, _ttl: Duration) -> Result<(), DomainError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn take(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn tracks_sessions(&self) -> bool {
        false
    }

    async fn confirm(&self, _key: &str, _subject: &str) -> Result<bool, DomainError> {
        Ok(true)
    }

    async fn consume(&self, _key: &str, _subject: &str) -> Result<bool, DomainError> {
        Ok(true)
    }
}
