//! Business services containing domain logic and use cases.

pub mod credentials;
pub mod token;

// Re-export commonly used types
pub use credentials::{CredentialVerifier, StaticCredentialVerifier};
pub use token::{ClaimCodec, TokenService, TokenServiceConfig};
