//! Conversation threads and their turn history

mod store;
mod turn;

pub use store::SessionStore;
pub use turn::{ThreadId, Turn};
