//! Infrastructure layer - External service implementations

pub mod assistant;
pub mod crag;
pub mod embedding;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod session;
pub mod vector_index;
