//! # Tessera Core
//!
//! Core token lifecycle logic for the Tessera backend.
//! This crate contains the claim and token entities, the session store
//! contract used as a revocation index, the token and credential services,
//! and the error types they report.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::{ClaimSet, ExtraClaims, TokenKind, TokenPair};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{InMemorySessionStore, NoRevocation, SessionStore};
pub use services::{
    ClaimCodec, CredentialVerifier, StaticCredentialVerifier, TokenService, TokenServiceConfig,
};
