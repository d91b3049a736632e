//! Token entities for paired access/refresh authentication.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access token lifetime in seconds (1 hour)
pub const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 60 * 60;

/// Refresh token lifetime in seconds (7 days)
pub const REFRESH_TOKEN_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Wire name of the subject claim
pub const SUBJECT_CLAIM: &str = "sub";

/// Wire name of the token identifier claim
pub const TOKEN_ID_CLAIM: &str = "jti";

/// Wire name of the expiry claim
pub const EXPIRY_CLAIM: &str = "exp";

/// Claims written by the token service itself; callers may not supply them
pub const RESERVED_CLAIMS: [&str; 3] = [SUBJECT_CLAIM, TOKEN_ID_CLAIM, EXPIRY_CLAIM];

/// Free-form caller claims carried alongside the subject
pub type ExtraClaims = Map<String, Value>;

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by a token
///
/// `token_id` is `None` on claim sets built by callers; the token service
/// assigns it when minting and the codec fills it in when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (authenticated principal)
    pub subject: String,

    /// Caller-supplied claims, never containing a reserved key
    #[serde(default)]
    pub extra: ExtraClaims,

    /// Token identifier, used as the session store key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

impl ClaimSet {
    /// Creates a claim set for the given subject with no extra claims
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            extra: ExtraClaims::new(),
            token_id: None,
        }
    }

    /// Adds an extra claim
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Replaces the extra claims
    pub fn with_extra(mut self, extra: ExtraClaims) -> Self {
        self.extra = extra;
        self
    }

    /// Returns a copy carrying the given token identifier
    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    /// Returns the first reserved key present in the extra claims, if any
    pub fn reserved_collision(&self) -> Option<&'static str> {
        RESERVED_CLAIMS
            .iter()
            .copied()
            .find(|claim| self.extra.contains_key(*claim))
    }
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
