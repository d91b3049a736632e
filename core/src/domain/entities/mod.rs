//! Domain entities representing tokens and their claims.

pub mod token;

// Re-export commonly used types
pub use token::{
    ClaimSet, ExtraClaims, TokenKind, TokenPair, ACCESS_TOKEN_EXPIRY_SECONDS,
    REFRESH_TOKEN_EXPIRY_SECONDS, RESERVED_CLAIMS,
};
