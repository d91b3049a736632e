//! Unit tests for token service

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::entities::token::{ClaimSet, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemorySessionStore, NoRevocation, SessionStore};
use crate::services::token::linkage;
use crate::services::token::{
    ClaimCodec, TokenService, TokenServiceConfig, MAX_TOKEN_LIFETIME_SECONDS,
};

const ACCESS_SECRET: &str = "access-secret-for-tests";
const REFRESH_SECRET: &str = "refresh-secret-for-tests";

fn config() -> TokenServiceConfig {
    TokenServiceConfig::new(ACCESS_SECRET, REFRESH_SECRET)
}

fn service() -> TokenService<InMemorySessionStore> {
    TokenService::new(InMemorySessionStore::new(), config()).unwrap()
}

/// Reads the token identifier out of a token without touching the store
fn token_id(token: &str, kind: TokenKind) -> String {
    let codec = ClaimCodec::new(ACCESS_SECRET.as_bytes(), REFRESH_SECRET.as_bytes());
    let (claims, _) = codec.decode(token, kind).unwrap();
    claims.token_id.unwrap()
}

fn is_unauthorized(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::Token(TokenError::Unauthorized)))
}

fn is_invalid(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::Token(TokenError::InvalidToken)))
}

/// Store whose writes of refresh entries fail, recording every call
#[derive(Default)]
struct FailingRefreshStore {
    inner: InMemorySessionStore,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl SessionStore for FailingRefreshStore {
    async fn put(&self, key: &str, subject: &str, ttl: Duration) -> Result<(), DomainError> {
        if linkage::is_refresh_identifier(key) {
            return Err(DomainError::StoreUnavailable {
                message: "connection refused".to_string(),
            });
        }
        self.inner.put(key, subject, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.inner.delete(key).await
    }

    async fn take(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.take(key).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Store that is unreachable for every call
struct DownStore;

#[async_trait]
impl SessionStore for DownStore {
    async fn put(&self, _: &str, _: &str, _: Duration) -> Result<(), DomainError> {
        Err(down())
    }

    async fn get(&self, _: &str) -> Result<Option<String>, DomainError> {
        Err(down())
    }

    async fn delete(&self, _: &str) -> Result<(), DomainError> {
        Err(down())
    }

    async fn take(&self, _: &str) -> Result<Option<String>, DomainError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(down())
    }
}

fn down() -> DomainError {
    DomainError::StoreUnavailable {
        message: "timed out".to_string(),
    }
}

#[tokio::test]
async fn test_new_rejects_invalid_config() {
    let result = TokenService::new(
        InMemorySessionStore::new(),
        TokenServiceConfig::new("same", "same"),
    );
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_create_records_both_sessions() {
    let service = service();

    let pair = service
        .create_tokens(ClaimSet::new("u1").with_claim("role", "admin"))
        .await
        .unwrap();

    assert_eq!(pair.access_expires_in, 3600);
    assert_eq!(pair.refresh_expires_in, 604800);

    let access_id = token_id(&pair.access_token, TokenKind::Access);
    let refresh_id = token_id(&pair.refresh_token, TokenKind::Refresh);
    assert_eq!(refresh_id, linkage::derive_refresh_identifier(&access_id));

    let store = service.store();
    assert_eq!(store.get(&access_id).await.unwrap(), Some("u1".to_string()));
    assert_eq!(store.get(&refresh_id).await.unwrap(), Some("u1".to_string()));
}

#[tokio::test]
async fn test_create_ignores_caller_token_id() {
    let service = service();

    let pair = service
        .create_tokens(ClaimSet::new("u1").with_token_id("chosen-by-caller"))
        .await
        .unwrap();

    assert_ne!(token_id(&pair.access_token, TokenKind::Access), "chosen-by-caller");
}

#[tokio::test]
async fn test_create_rejects_reserved_claim() {
    let service = service();

    let result = service
        .create_tokens(ClaimSet::new("u1").with_claim("exp", 0))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::ReservedClaim { .. }))
    ));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_create_rejects_empty_subject() {
    let service = service();

    let result = service.create_tokens(ClaimSet::new("")).await;

    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_new_rejects_oversized_lifetime() {
    let result = TokenService::new(
        InMemorySessionStore::new(),
        config().with_expiry(10_000_000_000_000, 10_000_000_000_000),
    );
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_create_with_maximum_lifetime() {
    let service = TokenService::new(
        InMemorySessionStore::new(),
        config().with_expiry(MAX_TOKEN_LIFETIME_SECONDS, MAX_TOKEN_LIFETIME_SECONDS),
    )
    .unwrap();

    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    assert_eq!(pair.refresh_expires_in, MAX_TOKEN_LIFETIME_SECONDS);
    assert!(service.verify_access_token(&pair.access_token).await.is_ok());
}

#[tokio::test]
async fn test_create_and_verify() {
    let service = service();
    let pair = service
        .create_tokens(ClaimSet::new("u1").with_claim("role", "admin"))
        .await
        .unwrap();

    let claims = service.verify_access_token(&pair.access_token).await.unwrap();

    assert_eq!(claims.subject, "u1");
    assert_eq!(claims.extra.get("role"), Some(&json!("admin")));
    assert_eq!(
        claims.token_id,
        Some(token_id(&pair.access_token, TokenKind::Access))
    );
}

#[tokio::test]
async fn test_verify_rejects_refresh_token() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    assert!(is_invalid(&service.verify_access_token(&pair.refresh_token).await));
}

#[tokio::test]
async fn test_verify_rejects_garbage() {
    let service = service();
    assert!(is_invalid(&service.verify_access_token("garbage").await));
}

#[tokio::test]
async fn test_verify_rejects_missing_session() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    let access_id = token_id(&pair.access_token, TokenKind::Access);
    service.store().delete(&access_id).await.unwrap();

    assert!(is_unauthorized(&service.verify_access_token(&pair.access_token).await));
}

#[tokio::test]
async fn test_verify_rejects_subject_mismatch() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    let access_id = token_id(&pair.access_token, TokenKind::Access);
    service
        .store()
        .put(&access_id, "u2", Duration::from_secs(60))
        .await
        .unwrap();

    assert!(is_unauthorized(&service.verify_access_token(&pair.access_token).await));
}

#[tokio::test]
async fn test_revoke_invalidates_pair() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    service.revoke_tokens(&pair.access_token).await.unwrap();

    assert!(is_unauthorized(&service.verify_access_token(&pair.access_token).await));
    assert!(is_unauthorized(&service.refresh_tokens(&pair.refresh_token).await));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    service.revoke_tokens(&pair.access_token).await.unwrap();
    service.revoke_tokens(&pair.access_token).await.unwrap();
}

#[tokio::test]
async fn test_revoke_leaves_other_pairs() {
    let service = service();
    let first = service.create_tokens(ClaimSet::new("u1")).await.unwrap();
    let second = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    service.revoke_tokens(&first.access_token).await.unwrap();

    assert!(service.verify_access_token(&second.access_token).await.is_ok());
}

#[tokio::test]
async fn test_revoke_rejects_refresh_token() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    assert!(is_invalid(&service.revoke_tokens(&pair.refresh_token).await));
    assert_eq!(service.store().len().await, 2);
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let service = service();
    let old = service
        .create_tokens(ClaimSet::new("u1").with_claim("tenant", "t1"))
        .await
        .unwrap();

    let new = service.refresh_tokens(&old.refresh_token).await.unwrap();

    assert_ne!(new.access_token, old.access_token);
    assert_ne!(new.refresh_token, old.refresh_token);

    let claims = service.verify_access_token(&new.access_token).await.unwrap();
    assert_eq!(claims.subject, "u1");
    assert_eq!(claims.extra.get("tenant"), Some(&json!("t1")));

    // The old pair is dead
    assert!(is_unauthorized(&service.verify_access_token(&old.access_token).await));
    assert!(is_unauthorized(&service.refresh_tokens(&old.refresh_token).await));
    assert_eq!(service.store().len().await, 2);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let service = service();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    assert!(is_invalid(&service.refresh_tokens(&pair.access_token).await));
    assert!(service.verify_access_token(&pair.access_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_chain() {
    let service = service();
    let mut pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    for _ in 0..5 {
        pair = service.refresh_tokens(&pair.refresh_token).await.unwrap();
    }

    assert!(service.verify_access_token(&pair.access_token).await.is_ok());
    assert_eq!(service.store().len().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_has_single_winner() {
    let service = Arc::new(service());
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { service.refresh_tokens(&token).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(matches!(e, DomainError::Token(TokenError::Unauthorized))),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(service.store().len().await, 2);
}

#[tokio::test]
async fn test_store_failure_during_create_cleans_up() {
    let service = TokenService::new(FailingRefreshStore::default(), config()).unwrap();

    let result = service.create_tokens(ClaimSet::new("u1")).await;

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert!(service.store().inner.is_empty().await);
    assert_eq!(service.store().deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_store_surfaces_as_unavailable() {
    let working = service();
    let pair = working.create_tokens(ClaimSet::new("u1")).await.unwrap();

    let service = TokenService::new(DownStore, config()).unwrap();

    assert!(matches!(
        service.verify_access_token(&pair.access_token).await,
        Err(DomainError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        service.refresh_tokens(&pair.refresh_token).await,
        Err(DomainError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        service.revoke_tokens(&pair.access_token).await,
        Err(DomainError::StoreUnavailable { .. })
    ));
    // Signature checks run before the store is consulted
    assert!(is_invalid(&service.verify_access_token("garbage").await));
}

#[tokio::test]
async fn test_stateless_mode() {
    let service = TokenService::new(NoRevocation::new(), config()).unwrap();
    let pair = service
        .create_tokens(ClaimSet::new("u1").with_claim("role", "admin"))
        .await
        .unwrap();

    // Logout succeeds but cannot revoke
    service.revoke_tokens(&pair.access_token).await.unwrap();
    let claims = service.verify_access_token(&pair.access_token).await.unwrap();
    assert_eq!(claims.subject, "u1");

    // Refresh tokens stay redeemable
    let first = service.refresh_tokens(&pair.refresh_token).await.unwrap();
    let second = service.refresh_tokens(&pair.refresh_token).await.unwrap();
    assert_ne!(first.access_token, second.access_token);

    // Signature checks still apply
    assert!(is_invalid(&service.verify_access_token(&pair.refresh_token).await));
}

#[tokio::test]
async fn test_dynamic_store() {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let service = TokenService::new(store, config()).unwrap();

    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();
    service.revoke_tokens(&pair.access_token).await.unwrap();

    assert!(is_unauthorized(&service.verify_access_token(&pair.access_token).await));
}

#[tokio::test(start_paused = true)]
async fn test_session_expires_with_token_lifetime() {
    let service = TokenService::new(
        InMemorySessionStore::new(),
        config().with_expiry(60, 120),
    )
    .unwrap();
    let pair = service.create_tokens(ClaimSet::new("u1")).await.unwrap();
    let refresh_id = token_id(&pair.refresh_token, TokenKind::Refresh);

    tokio::time::advance(Duration::from_secs(61)).await;

    assert!(service.store().contains(&refresh_id).await);
    assert_eq!(service.store().len().await, 1);

    tokio::time::advance(Duration::from_secs(60)).await;

    assert!(service.store().is_empty().await);
}
