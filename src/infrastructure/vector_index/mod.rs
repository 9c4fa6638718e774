//! Vector index implementations

mod embedder;
mod factory;
mod in_memory;
mod qdrant;

pub use embedder::Embedder;
pub use factory::{VectorIndexFactory, VectorIndexProvider};
pub use in_memory::InMemoryVectorIndex;
pub use qdrant::{QdrantConfig, QdrantVectorIndex};
