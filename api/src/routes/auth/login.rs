use actix_web::{web, HttpResponse};
use tessera_core::domain::ClaimSet;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/login
///
/// Checks the credentials and issues a fresh token pair for the subject
/// they belong to.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "string",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "access_expires_in": 3600,
///     "refresh_expires_in": 604800
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty username or password
/// - 401 Unauthorized: Unknown user or wrong password
/// - 422 Unprocessable Entity: Malformed JSON body
/// - 503 Service Unavailable: Session store unreachable
pub async fn login(state: web::Data<AppState>, request: web::Json<LoginRequest>) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let subject = match state
        .credentials
        .check_credentials(&request.username, &request.password)
        .await
    {
        Ok(subject) => subject,
        Err(error) => return handle_domain_error(&error),
    };

    match state.token_service.create_tokens(ClaimSet::new(subject)).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
