//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the embedding dimensions for a model
    fn dimensions(&self, model: &str) -> Option<usize>;
}

/// Embed a single text and return its vector
pub async fn embed_one(
    provider: &dyn EmbeddingProvider,
    model: &str,
    text: &str,
) -> Result<Vec<f32>, DomainError> {
    provider
        .embed(EmbeddingRequest::single(model, text))
        .await?
        .into_vectors()
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::provider(provider.provider_name(), "Empty embedding response"))
}
