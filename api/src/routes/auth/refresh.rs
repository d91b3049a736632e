use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/refresh
///
/// Redeems a refresh token for a brand-new pair. The redeemed token and
/// the access token issued with it stop working immediately.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Same body as login.
///
/// ## Errors
/// - 401 Unauthorized: Invalid, expired, revoked or already redeemed refresh token
/// - 422 Unprocessable Entity: Malformed JSON body
/// - 503 Service Unavailable: Session store unreachable
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state.token_service.refresh_tokens(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
