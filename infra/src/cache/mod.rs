//! Cache module for the Redis-backed session store
//!
//! This module provides the Redis client with retry logic and the
//! [`SessionStore`](tessera_core::repositories::SessionStore) implementation
//! built on top of it.

pub mod redis_client;
pub mod session_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use session_store::RedisSessionStore;

// Re-export commonly used types
pub use tessera_shared::config::CacheConfig;
