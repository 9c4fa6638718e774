//! Session store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::turn::{ThreadId, Turn};
use crate::domain::DomainError;

/// Durable, thread-indexed turn history
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Append a turn to the thread, creating the thread if needed
    async fn append(&self, thread: &ThreadId, turn: Turn) -> Result<(), DomainError>;

    /// All turns of a thread, oldest first
    async fn history(&self, thread: &ThreadId) -> Result<Vec<Turn>, DomainError>;
}
