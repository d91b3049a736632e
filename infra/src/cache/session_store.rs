//! Redis-backed session store

use std::time::Duration;

use async_trait::async_trait;
use tessera_core::errors::DomainError;
use tessera_core::repositories::SessionStore;
use tracing::info;

use super::{CacheConfig, RedisClient};
use crate::InfrastructureError;

/// Session store keeping one Redis string per live token
///
/// The key is the token identifier (behind the configured prefix), the
/// value is the subject and the Redis TTL is the token's remaining
/// lifetime, so Redis expires sessions together with their tokens.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
    config: CacheConfig,
}

impl RedisSessionStore {
    /// Wraps an existing client
    pub fn new(client: RedisClient, config: CacheConfig) -> Self {
        Self { client, config }
    }

    /// Connects to Redis and checks it answers PING
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(&config).await?;

        if !client.health_check().await? {
            return Err(InfrastructureError::Config(
                "Redis did not answer PING".to_string(),
            ));
        }

        info!(prefix = ?config.key_prefix, "Redis session store ready");
        Ok(Self::new(client, config))
    }

    fn key(&self, token_id: &str) -> String {
        self.config.make_key(token_id)
    }
}

/// Whole seconds for a Redis TTL, rounded up and never zero
pub(crate) fn ttl_seconds(ttl: Duration) -> u64 {
    let seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    seconds.max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, key: &str, subject: &str, ttl: Duration) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(&self.key(key), subject, ttl_seconds(ttl))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(&self.key(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.client.delete(&self.key(key)).await?;
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.take(&self.key(key)).await?)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            Err(DomainError::StoreUnavailable {
                message: "unexpected PING reply".to_string(),
            })
        }
    }
}
