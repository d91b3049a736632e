pub mod auth;
pub mod error;
pub mod todo;

pub use auth::{LoginRequest, LogoutResponse, RefreshTokenRequest, TokenResponse};
pub use error::{ErrorResponse, ErrorResponseExt};
pub use todo::{CreateTodoRequest, TodoResponse};
