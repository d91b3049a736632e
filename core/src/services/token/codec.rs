//! Signed claim encoding
//!
//! Tokens are compact HS256 JWS strings. The reserved claims `sub`, `jti`
//! and `exp` sit next to the caller's extra claims in one flat JSON object.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::entities::token::{
    ClaimSet, TokenKind, EXPIRY_CLAIM, SUBJECT_CLAIM, TOKEN_ID_CLAIM,
};
use crate::errors::{DomainError, TokenError};

/// The only signing algorithm the codec produces or accepts
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

struct KindKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KindKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Encodes claim sets into signed tokens and validates them back
///
/// Holds one key pair per [`TokenKind`]. Stateless otherwise; safe to share
/// across threads.
pub struct ClaimCodec {
    access: KindKeys,
    refresh: KindKeys,
    validation: Validation,
}

impl ClaimCodec {
    /// Creates a codec from the access and refresh secrets
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = vec![SIGNING_ALGORITHM];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        // Extra claims are free-form, an "aud" among them is not ours to check
        validation.validate_aud = false;
        validation.set_required_spec_claims(&[EXPIRY_CLAIM, SUBJECT_CLAIM]);

        Self {
            access: KindKeys::from_secret(access_secret),
            refresh: KindKeys::from_secret(refresh_secret),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> &KindKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Signs `claims` as a token of the given kind
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError::Validation)` - The subject is empty
    /// * `Err(TokenError::ReservedClaim)` - An extra claim uses a reserved key
    /// * `Err(TokenError::TokenGenerationFailed)` - No token identifier, or serialization failed
    pub fn encode(
        &self,
        claims: &ClaimSet,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        // decode refuses an empty "sub", so never sign one
        if claims.subject.is_empty() {
            return Err(DomainError::Validation {
                message: "subject must not be empty".to_string(),
            });
        }
        if let Some(claim) = claims.reserved_collision() {
            return Err(TokenError::ReservedClaim {
                claim: claim.to_string(),
            }
            .into());
        }
        let token_id = claims
            .token_id
            .as_deref()
            .ok_or(TokenError::TokenGenerationFailed)?;

        let mut payload: Map<String, Value> = claims.extra.clone();
        payload.insert(SUBJECT_CLAIM.to_string(), Value::from(claims.subject.as_str()));
        payload.insert(TOKEN_ID_CLAIM.to_string(), Value::from(token_id));
        payload.insert(EXPIRY_CLAIM.to_string(), Value::from(expires_at.timestamp()));

        encode(&Header::new(SIGNING_ALGORITHM), &payload, &self.keys(kind).encoding).map_err(|e| {
            debug!(kind = %kind, error = %e, "Token encoding failed");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Validates a token of the given kind and returns its claims and expiry
    ///
    /// Signature, algorithm, structure and expiry failures all yield
    /// `TokenError::InvalidToken`.
    pub fn decode(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<(ClaimSet, DateTime<Utc>), DomainError> {
        let data = decode::<Map<String, Value>>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|e| {
                debug!(kind = %kind, error = %e, "Token rejected");
                DomainError::Token(TokenError::InvalidToken)
            })?;

        let mut extra = data.claims;
        let subject = take_string(&mut extra, SUBJECT_CLAIM)?;
        let token_id = take_string(&mut extra, TOKEN_ID_CLAIM)?;
        let expires_at = extra
            .remove(EXPIRY_CLAIM)
            .and_then(|exp| exp.as_i64())
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .ok_or(TokenError::InvalidToken)?;

        let claims = ClaimSet {
            subject,
            extra,
            token_id: Some(token_id),
        };

        Ok((claims, expires_at))
    }
}

fn take_string(claims: &mut Map<String, Value>, key: &str) -> Result<String, DomainError> {
    match claims.remove(key) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value),
        _ => Err(TokenError::InvalidToken.into()),
    }
}
