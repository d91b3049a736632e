//! Error types for token handling and authentication
//!
//! Messages are deliberately coarse: a caller can tell that a token was
//! rejected, never which check rejected it.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed token, unexpected signing algorithm, bad signature or expired
    #[error("Invalid token")]
    InvalidToken,

    /// Well-formed token whose session is revoked, unknown or owned by another subject
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller-supplied extra claim collides with a claim managed by the token service
    #[error("Reserved claim: {claim}")]
    ReservedClaim { claim: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}
