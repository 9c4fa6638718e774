//! Vector index provider trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::filter::MetadataFilter;
use super::passage::{NewPassage, Passage};
use crate::domain::DomainError;

/// Search parameters for similarity queries
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Query text to search for
    pub query: String,
    /// Number of results to return
    pub top_k: usize,
    pub filter: Option<MetadataFilter>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 5,
            filter: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_filter(mut self, filter: MetadataFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Similarity search over embedded passages
///
/// Implementations embed the query text themselves and return results in
/// descending score order.
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Provider identifier, e.g. "qdrant"
    fn provider_type(&self) -> &'static str;

    /// Search for passages similar to the query text
    async fn search(&self, params: SearchParams) -> Result<Vec<Passage>, DomainError>;

    /// Embed and store passages, returning their ids
    async fn add_passages(&self, passages: Vec<NewPassage>) -> Result<Vec<String>, DomainError>;

    /// Delete all passages matching the filter, returning how many were removed when known
    async fn delete_by_filter(&self, filter: MetadataFilter) -> Result<Option<usize>, DomainError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}
