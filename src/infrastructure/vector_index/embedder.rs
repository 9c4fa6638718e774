//! Embedding model binding shared by vector index adapters

use std::sync::Arc;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;

/// An embedding provider bound to one model and dimension count
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimensions: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed a single search query
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.embed_batch(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::vector_index("Failed to generate query embedding"))
    }

    /// Embed passages in input order
    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let request = EmbeddingRequest::new(&self.model, texts).with_dimensions(self.dimensions);
        let vectors = self.provider.embed(request).await?.into_vectors();

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(DomainError::vector_index(format!(
                "Embedding has {} dimensions, expected {}",
                bad.len(),
                self.dimensions
            )));
        }

        Ok(vectors)
    }
}
