//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::vector_index::VectorIndex;
use crate::infrastructure::assistant::Assistant;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    /// Same index the assistant retrieves from, used for corpus administration and readiness
    pub index: Arc<dyn VectorIndex>,
}

impl AppState {
    pub fn new(assistant: Arc<Assistant>, index: Arc<dyn VectorIndex>) -> Self {
        Self { assistant, index }
    }
}
