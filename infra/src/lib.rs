//! # Infrastructure Layer
//!
//! Concrete session store backends for the Tessera token service.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client with retry logic and the Redis session store
//! - **Wiring**: selection between the Redis store and stateless operation

use std::sync::Arc;

use tessera_core::errors::DomainError;
use tessera_core::repositories::{NoRevocation, SessionStore};
use tessera_shared::config::CacheConfig;

/// Cache module - Redis client and the session store built on it
pub mod cache;

pub use cache::{RedisClient, RedisSessionStore};

/// Build the session store the deployment is configured for
///
/// Without a Redis configuration the service runs stateless: tokens are
/// still signed and checked, but nothing can be revoked. With one, Redis
/// must be reachable; a failed connection is returned rather than silently
/// degrading to stateless operation.
pub async fn connect_session_store(
    config: Option<&CacheConfig>,
) -> Result<Arc<dyn SessionStore>, InfrastructureError> {
    match config {
        Some(config) => {
            let store = RedisSessionStore::connect(config.clone()).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("REDIS_URL not set; running without token revocation");
            Ok(Arc::new(NoRevocation::new()))
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::StoreUnavailable {
            message: error.to_string(),
        }
    }
}
