//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login with username and password
//! - Token refresh
//! - Logout

pub mod login;
pub mod logout;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh_token;
