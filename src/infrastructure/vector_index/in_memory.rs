//! In-memory vector index for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Embedder;
use crate::domain::embedding::cosine_similarity;
use crate::domain::vector_index::{MetadataFilter, NewPassage, Passage, SearchParams, VectorIndex};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredPassage {
    id: String,
    content: String,
    metadata: HashMap<String, serde_json::Value>,
    vector: Vec<f32>,
}

fn matches_filter(passage: &StoredPassage, filter: &MetadataFilter) -> bool {
    filter.evaluate(&|key: &str| passage.metadata.get(key).and_then(|v| v.as_str()))
}

/// Brute-force cosine similarity over passages held in memory
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    embedder: Embedder,
    passages: Arc<RwLock<Vec<StoredPassage>>>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Embedder) -> Self {
        Self {
            embedder,
            passages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored passages
    pub async fn len(&self) -> usize {
        self.passages.read().await.len()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn provider_type(&self) -> &'static str {
        "in_memory"
    }

    async fn search(&self, params: SearchParams) -> Result<Vec<Passage>, DomainError> {
        let query_vector = self.embedder.embed_query(&params.query).await?;
        let passages = self.passages.read().await;

        let mut scored: Vec<Passage> = passages
            .iter()
            .filter(|p| params.filter.as_ref().is_none_or(|f| matches_filter(p, f)))
            .map(|p| Passage {
                id: p.id.clone(),
                content: p.content.clone(),
                score: cosine_similarity(&query_vector, &p.vector),
                metadata: p.metadata.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(params.top_k);

        Ok(scored)
    }

    async fn add_passages(&self, passages: Vec<NewPassage>) -> Result<Vec<String>, DomainError> {
        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let vectors = self.embedder.embed_batch(texts).await?;

        let mut stored = self.passages.write().await;
        let mut ids = Vec::with_capacity(passages.len());

        for (passage, vector) in passages.into_iter().zip(vectors) {
            let id = passage.id.unwrap_or_else(|| Uuid::new_v4().to_string());
            ids.push(id.clone());

            let entry = StoredPassage {
                id,
                content: passage.content,
                metadata: passage.metadata,
                vector,
            };
            // Upsert: an existing id is overwritten in place
            match stored.iter_mut().find(|p| p.id == entry.id) {
                Some(existing) => *existing = entry,
                None => stored.push(entry),
            }
        }

        Ok(ids)
    }

    async fn delete_by_filter(&self, filter: MetadataFilter) -> Result<Option<usize>, DomainError> {
        let mut passages = self.passages.write().await;
        let before = passages.len();

        passages.retain(|p| !matches_filter(p, &filter));

        Ok(Some(before - passages.len()))
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
