//! Main token service implementation

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::domain::entities::token::{ClaimSet, TokenKind, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::SessionStore;

use super::codec::ClaimCodec;
use super::config::TokenServiceConfig;
use super::linkage;

/// Issues, verifies, rotates and revokes access/refresh token pairs
///
/// Every issued token has an entry in the session store keyed by its
/// identifier; a token whose entry is gone is refused even though its
/// signature and expiry are fine. The refresh identifier of a pair is
/// derived from the access identifier, so revoking one half locates the
/// other without a lookup.
pub struct TokenService<S: SessionStore> {
    pub(crate) store: S,
    codec: ClaimCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S: SessionStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Session store used as the revocation index
    /// * `config` - Signing secrets and token lifetimes
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a validation error for unusable secrets
    pub fn new(store: S, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;

        if !store.tracks_sessions() {
            warn!("Session store does not track sessions; logout and rotation cannot revoke tokens");
        }

        Ok(Self {
            codec: ClaimCodec::new(&config.access_secret, &config.refresh_secret),
            access_ttl: config.access_ttl()?,
            refresh_ttl: config.refresh_ttl()?,
            store,
        })
    }

    /// Returns the underlying session store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mints a new token pair for the given claims
    ///
    /// Any token identifier on `claims` is ignored; a fresh one is generated.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The signed pair, both halves recorded in the store
    /// * `Err(DomainError::Validation)` - The subject is empty
    /// * `Err(TokenError::ReservedClaim)` - An extra claim uses a reserved key
    /// * `Err(DomainError::StoreUnavailable)` - The sessions could not be recorded
    pub async fn create_tokens(&self, claims: ClaimSet) -> Result<TokenPair, DomainError> {
        let access_id = linkage::new_access_identifier();
        let refresh_id = linkage::derive_refresh_identifier(&access_id);

        let now = whole_seconds(Utc::now());
        let access_expiry = expiry_after(now, self.access_ttl)?;
        let refresh_expiry = expiry_after(now, self.refresh_ttl)?;

        let access_token = self.codec.encode(
            &claims.clone().with_token_id(access_id.as_str()),
            TokenKind::Access,
            access_expiry,
        )?;
        let refresh_token = self.codec.encode(
            &claims.clone().with_token_id(refresh_id.as_str()),
            TokenKind::Refresh,
            refresh_expiry,
        )?;

        self.record_sessions(&claims.subject, &access_id, &refresh_id)
            .await?;

        info!(subject = %claims.subject, token_id = %access_id, "Issued token pair");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.access_ttl.num_seconds(),
            self.refresh_ttl.num_seconds(),
        ))
    }

    /// Writes both session entries, undoing the first if the second fails
    async fn record_sessions(
        &self,
        subject: &str,
        access_id: &str,
        refresh_id: &str,
    ) -> Result<(), DomainError> {
        let access_ttl = to_std(self.access_ttl);
        let refresh_ttl = to_std(self.refresh_ttl);

        if let Err(e) = self.store.put(access_id, subject, access_ttl).await {
            error!(token_id = %access_id, error = %e, "Failed to record access session");
            return Err(e);
        }
        if let Err(e) = self.store.put(refresh_id, subject, refresh_ttl).await {
            error!(token_id = %refresh_id, error = %e, "Failed to record refresh session");
            let _ = self.store.delete(access_id).await;
            return Err(e);
        }
        Ok(())
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(ClaimSet)` - The token is valid and its session is live
    /// * `Err(TokenError::InvalidToken)` - Malformed, forged or expired token
    /// * `Err(TokenError::Unauthorized)` - The session was revoked or belongs to another subject
    /// * `Err(DomainError::StoreUnavailable)` - The store could not be consulted
    pub async fn verify_access_token(&self, token: &str) -> Result<ClaimSet, DomainError> {
        let (claims, _) = self.codec.decode(token, TokenKind::Access)?;
        let token_id = claims
            .token_id
            .as_deref()
            .ok_or(TokenError::InvalidToken)?;

        if linkage::is_refresh_identifier(token_id) {
            return Err(TokenError::InvalidToken.into());
        }

        if !self.store.confirm(token_id, &claims.subject).await? {
            return Err(TokenError::Unauthorized.into());
        }

        Ok(claims)
    }

    /// Redeems a refresh token for a brand-new pair
    ///
    /// The presented token and its access partner are revoked first. The
    /// refresh session is consumed atomically, so a refresh token is
    /// redeemable exactly once even under concurrent presentation.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The replacement pair, carrying the same subject and extra claims
    /// * `Err(TokenError::InvalidToken)` - Malformed, forged or expired token
    /// * `Err(TokenError::Unauthorized)` - Already redeemed or revoked
    /// * `Err(DomainError::StoreUnavailable)` - The store could not be consulted
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let (claims, _) = self.codec.decode(refresh_token, TokenKind::Refresh)?;
        let refresh_id = claims
            .token_id
            .clone()
            .ok_or(TokenError::InvalidToken)?;
        let access_id = linkage::derive_access_identifier(&refresh_id)
            .ok_or(TokenError::InvalidToken)?;

        if !self.store.consume(&refresh_id, &claims.subject).await? {
            warn!(subject = %claims.subject, token_id = %access_id, "Refresh token rejected: session not live");
            return Err(TokenError::Unauthorized.into());
        }
        self.store.delete(access_id).await?;

        info!(subject = %claims.subject, token_id = %access_id, "Rotating token pair");

        self.create_tokens(ClaimSet::new(claims.subject).with_extra(claims.extra))
            .await
    }

    /// Revokes the pair an access token belongs to (logout)
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Both sessions are gone (always succeeds without revocation support)
    /// * `Err(TokenError::InvalidToken)` - Malformed, forged or expired token
    /// * `Err(DomainError::StoreUnavailable)` - The store could not be reached
    pub async fn revoke_tokens(&self, access_token: &str) -> Result<(), DomainError> {
        let (claims, _) = self.codec.decode(access_token, TokenKind::Access)?;
        let access_id = claims
            .token_id
            .as_deref()
            .ok_or(TokenError::InvalidToken)?;

        if linkage::is_refresh_identifier(access_id) {
            return Err(TokenError::InvalidToken.into());
        }

        self.store.delete(access_id).await?;
        self.store
            .delete(&linkage::derive_refresh_identifier(access_id))
            .await?;

        info!(subject = %claims.subject, token_id = %access_id, "Revoked token pair");
        Ok(())
    }
}

/// Drops sub-second precision so encoded and stored expiries agree
fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, DomainError> {
    now.checked_add_signed(ttl)
        .ok_or(DomainError::Token(TokenError::TokenGenerationFailed))
}

fn to_std(duration: Duration) -> std::time::Duration {
    duration.to_std().unwrap_or(std::time::Duration::ZERO)
}
