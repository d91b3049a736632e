//! Storage contracts used by the services, with in-process implementations.

pub mod session;

pub use session::{InMemorySessionStore, NoRevocation, SessionStore};
