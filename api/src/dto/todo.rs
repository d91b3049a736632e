//! Request and response bodies for the todo endpoint

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/todos`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
}

/// Echo of the created todo, attributed to the authenticated subject
#[derive(Debug, Deserialize, Serialize)]
pub struct TodoResponse {
    pub user_id: String,
    pub title: String,
}
