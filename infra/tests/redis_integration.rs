//! Integration tests for the Redis session store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p tessera_infra --test redis_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use tessera_core::domain::ClaimSet;
use tessera_core::errors::{DomainError, TokenError};
use tessera_core::repositories::SessionStore;
use tessera_core::services::{TokenService, TokenServiceConfig};
use tessera_infra::cache::{CacheConfig, RedisSessionStore};
use tessera_infra::connect_session_store;

fn config() -> CacheConfig {
    CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("tessera-test-{}", std::process::id()))
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_put_get_delete() {
    let store = RedisSessionStore::connect(config()).await.unwrap();

    store.put("id-1", "u1", Duration::from_secs(60)).await.unwrap();
    assert_eq!(store.get("id-1").await.unwrap(), Some("u1".to_string()));

    store.delete("id-1").await.unwrap();
    assert_eq!(store.get("id-1").await.unwrap(), None);

    // Deleting an absent key is fine
    store.delete("id-1").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_entry_expires() {
    let store = RedisSessionStore::connect(config()).await.unwrap();

    store.put("id-ttl", "u1", Duration::from_secs(1)).await.unwrap();
    assert!(store.get("id-ttl").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(store.get("id-ttl").await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_take_has_single_winner() {
    let store = Arc::new(RedisSessionStore::connect(config()).await.unwrap());
    store.put("id-race", "u1", Duration::from_secs(60)).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.take("id-race").await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_token_lifecycle_against_redis() {
    let store = connect_session_store(Some(&config())).await.unwrap();
    assert!(store.tracks_sessions());

    let service = TokenService::new(
        store,
        TokenServiceConfig::new("access-secret", "refresh-secret"),
    )
    .unwrap();

    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();
    assert!(service.verify_access_token(&pair.access_token).await.is_ok());

    let rotated = service.refresh_tokens(&pair.refresh_token).await.unwrap();
    assert!(matches!(
        service.refresh_tokens(&pair.refresh_token).await,
        Err(DomainError::Token(TokenError::Unauthorized))
    ));

    service.revoke_tokens(&rotated.access_token).await.unwrap();
    assert!(matches!(
        service.verify_access_token(&rotated.access_token).await,
        Err(DomainError::Token(TokenError::Unauthorized))
    ));
}
