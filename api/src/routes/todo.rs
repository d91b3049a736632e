use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::todo::{CreateTodoRequest, TodoResponse};
use crate::handlers::error::handle_validation_errors;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/todos
///
/// Attributes the todo to the authenticated subject and echoes it back.
/// Nothing is stored.
///
/// ## Errors
/// - 400 Bad Request: Empty or overlong title
/// - 401 Unauthorized: Missing, invalid or revoked access token
/// - 422 Unprocessable Entity: Malformed JSON body
pub async fn create_todo(auth: AuthContext, request: web::Json<CreateTodoRequest>) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let todo = TodoResponse {
        user_id: auth.subject,
        title: request.into_inner().title,
    };

    HttpResponse::Created().json(todo)
}
