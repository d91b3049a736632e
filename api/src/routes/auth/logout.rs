use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::LogoutResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the caller's access token together with its refresh token.
/// Requires authentication via Bearer token in Authorization header.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Successfully logged out"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or already revoked access token
/// - 503 Service Unavailable: Session store unreachable
pub async fn logout(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.token_service.revoke_tokens(&auth.access_token).await {
        Ok(()) => {
            tracing::info!(subject = %auth.subject, "User logged out");
            HttpResponse::Ok().json(LogoutResponse {
                message: "Successfully logged out".to_string(),
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}
