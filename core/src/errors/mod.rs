//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The session store could not be reached or answered with an error
    #[error("Session store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// True for failures a transport should report as "not authenticated"
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DomainError::Token(TokenError::InvalidToken)
                | DomainError::Token(TokenError::Unauthorized)
                | DomainError::Auth(AuthError::InvalidCredentials)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
