//! Process-local session store
//!
//! Backs the token service in tests and single-process development setups.
//! Entries expire lazily: an expired entry is treated as absent and is
//! dropped the next time the map is written.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::SessionStore;

#[derive(Debug, Clone)]
struct Entry {
    subject: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory session store with per-key expiry
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| entry.is_live(now)).count()
    }

    /// Whether the store holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether `key` is present and live
    pub async fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.get(key).is_some_and(|entry| entry.is_live(now))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, key: &str, subject: &str, ttl: Duration) -> Result<(), DomainError> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).ok_or_else(|| DomainError::Validation {
            message: "session lifetime out of range".to_string(),
        })?;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                subject: subject.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.subject.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.subject))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
