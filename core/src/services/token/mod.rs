//! Token service module
//!
//! This module handles the token pair lifecycle:
//! - Signed claim encoding and validation (HS256)
//! - Linkage between access and refresh identifiers
//! - Issuing, verifying, rotating and revoking pairs against a session store

mod codec;
mod config;
pub mod linkage;
mod service;

#[cfg(test)]
mod tests;

pub use codec::{ClaimCodec, SIGNING_ALGORITHM};
pub use config::{TokenServiceConfig, MAX_TOKEN_LIFETIME_SECONDS};
pub use service::TokenService;
