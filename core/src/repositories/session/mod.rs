pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;
pub mod noop;

pub use memory::InMemorySessionStore;
pub use noop::NoRevocation;
pub use r#trait::SessionStore;
