//! Session store trait defining the revocation index used by the token service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainError;

/// Key/value store with per-key time-to-live, used as a revocation index
///
/// A key is a token identifier and its value is the owning subject. Presence
/// of a key means the token is still live; deleting it revokes the token.
///
/// Every operation is individually atomic. No multi-key atomicity is assumed.
/// Implementations report transport failures as
/// [`DomainError::StoreUnavailable`], never as an absent key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create or overwrite an entry with a fresh time-to-live
    ///
    /// # Arguments
    /// * `key` - Token identifier
    /// * `subject` - Subject owning the token
    /// * `ttl` - Remaining lifetime of the token
    async fn put(&self, key: &str, subject: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Look up the subject stored for a token identifier
    ///
    /// # Returns
    /// * `Ok(Some(subject))` - Entry is live
    /// * `Ok(None)` - Entry is absent or has expired
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Remove an entry; removing an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Atomically remove an entry and return the value it held
    ///
    /// Of several concurrent calls for the same key at most one observes
    /// `Some`.
    async fn take(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    /// Whether this store records sessions at all
    fn tracks_sessions(&self) -> bool {
        true
    }

    /// Check that `key` is live and owned by `subject`
    async fn confirm(&self, key: &str, subject: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.as_deref() == Some(subject))
    }

    /// Redeem `key` once: remove it and check it was owned by `subject`
    async fn consume(&self, key: &str, subject: &str) -> Result<bool, DomainError> {
        Ok(self.take(key).await?.as_deref() == Some(subject))
    }
}

#[async_trait]
impl<T> SessionStore for Arc<T>
where
    T: SessionStore + ?Sized,
{
    async fn put(&self, key: &str, subject: &str, ttl: Duration) -> Result<(), DomainError> {
        (**self).put(key, subject, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        (**self).delete(key).await
    }

    async fn take(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).take(key).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        (**self).ping().await
    }

    fn tracks_sessions(&self) -> bool {
        (**self).tracks_sessions()
    }

    async fn confirm(&self, key: &str, subject: &str) -> Result<bool, DomainError> {
        (**self).confirm(key, subject).await
    }

    async fn consume(&self, key: &str, subject: &str) -> Result<bool, DomainError> {
        (**self).consume(key, subject).await
    }
}
