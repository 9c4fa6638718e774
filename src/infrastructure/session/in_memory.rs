//! In-memory session store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::session::{SessionStore, ThreadId, Turn};
use crate::domain::DomainError;

/// Turn history held in process memory; lost on restart
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    threads: RwLock<HashMap<ThreadId, Vec<Turn>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads with at least one turn
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, thread: &ThreadId, turn: Turn) -> Result<(), DomainError> {
        self.threads
            .write()
            .await
            .entry(thread.clone())
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn history(&self, thread: &ThreadId) -> Result<Vec<Turn>, DomainError> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread)
            .cloned()
            .unwrap_or_default())
    }
}
