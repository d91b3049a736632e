//! Credential checking for the login flow
//!
//! The token service never sees passwords: a login handler asks a
//! [`CredentialVerifier`] for the subject and then mints tokens for it.

mod service;
mod traits;

pub use service::StaticCredentialVerifier;
pub use traits::CredentialVerifier;
