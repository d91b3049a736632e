//! Conversion of domain and request errors into HTTP responses
//!
//! Authentication failures all share one body so a client cannot tell a
//! forged token from an expired or revoked one.

use std::fmt;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use tessera_core::errors::{AuthError, DomainError, TokenError};
use tessera_shared::errors::{error_codes, ErrorResponse};
use validator::ValidationErrors;

use crate::dto::ErrorResponseExt;

/// Status, error code and client-facing message for a domain error
fn describe(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Token(TokenError::InvalidToken)
        | DomainError::Token(TokenError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            "Invalid or expired token".to_string(),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_CREDENTIALS,
            "Please provide valid login details".to_string(),
        ),
        DomainError::Token(TokenError::ReservedClaim { claim }) => (
            StatusCode::BAD_REQUEST,
            error_codes::BAD_REQUEST,
            format!("Claim '{}' is reserved", claim),
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::StoreUnavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable, please try again later".to_string(),
        ),
        DomainError::Token(TokenError::TokenGenerationFailed) | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code, message) = describe(error);

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::debug!(error = %error, "Request rejected");
    }

    ErrorResponse::new(code, message).to_response(status)
}

/// Handle request body validation failures (400)
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();

    ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed")
        .add_detail("fields", fields)
        .to_response(StatusCode::BAD_REQUEST)
}

/// JSON extractor error handler: malformed or mistyped bodies are 422
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %error, "Invalid JSON body");

    let response = ErrorResponse::new(error_codes::UNPROCESSABLE_ENTITY, "Invalid json provided")
        .to_response(StatusCode::UNPROCESSABLE_ENTITY);

    InternalError::from_response(error, response).into()
}

/// Domain error usable as an actix-web error, for middleware and extractors
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        describe(&self.0).0
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(&self.0)
    }
}
