//! Vector index construction from configuration

use std::sync::Arc;
use std::time::Duration;

use super::{Embedder, InMemoryVectorIndex, QdrantConfig, QdrantVectorIndex};
use crate::config::VectorIndexConfig;
use crate::domain::vector_index::VectorIndex;
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClient;

/// Supported vector index backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorIndexProvider {
    Qdrant,
    InMemory,
}

/// Factory for creating vector index providers
#[derive(Debug)]
pub struct VectorIndexFactory;

impl VectorIndexFactory {
    /// Build the configured vector index backend
    pub fn create(
        config: &VectorIndexConfig,
        embedder: Embedder,
    ) -> Result<Arc<dyn VectorIndex>, DomainError> {
        match config.provider {
            VectorIndexProvider::Qdrant => {
                let mut qdrant = QdrantConfig::new(&config.url, &config.collection);
                if let Some(ref key) = config.api_key {
                    qdrant = qdrant.with_api_key(key);
                }

                let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
                Ok(Arc::new(QdrantVectorIndex::new(client, qdrant, embedder)))
            }
            VectorIndexProvider::InMemory => Ok(Arc::new(InMemoryVectorIndex::new(embedder))),
        }
    }
}
