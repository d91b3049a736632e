//! Shared configuration and common types for the Tessera server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - The error response body returned by the HTTP layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, Environment, JwtConfig, LoggingConfig, LoginConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
