//! Major Mate
//!
//! Retrieval-augmented assistant for university information:
//! - Query filtering and domain routing
//! - Department-scoped retrieval over a vector index
//! - Corrective grading of documents and generated answers
//! - Per-thread conversation history

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use infrastructure::{
    assistant::Assistant,
    embedding::OpenAiEmbeddingProvider,
    llm::{HttpClient, ModelClient, ModelSettings, OpenAiProvider},
    session::InMemorySessionStore,
    vector_index::{Embedder, VectorIndexFactory},
};

/// Wire providers, the vector index, the session store and the assistant
pub fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config
        .llm
        .resolve_api_key()
        .context("No API key configured; set APP__LLM__API_KEY or OPENAI_API_KEY")?;

    let http = HttpClient::with_timeout(Duration::from_secs(config.llm.timeout_secs))?;

    let llm = OpenAiProvider::with_base_url(http.clone(), api_key.clone(), &config.llm.base_url);
    let settings = ModelSettings::new(&config.llm.model)
        .with_temperature(config.llm.temperature)
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))
        .with_max_retries(config.llm.max_retries)
        .with_retry_backoff(Duration::from_millis(config.llm.retry_backoff_ms));
    let client = ModelClient::new(Arc::new(llm), settings);

    let embedding = OpenAiEmbeddingProvider::with_base_url(http, api_key, &config.llm.base_url);
    let embedder = Embedder::new(
        Arc::new(embedding),
        &config.embedding.model,
        config.embedding.dimensions,
    );
    let index = VectorIndexFactory::create(&config.vector_index, embedder)?;

    info!(
        model = %config.llm.model,
        vector_index = index.provider_type(),
        collection = %config.vector_index.collection,
        step_budget = config.pipeline.step_budget,
        "Assistant configured"
    );

    let assistant = Assistant::from_config(
        client,
        index.clone(),
        Arc::new(InMemorySessionStore::new()),
        &config.pipeline,
    );

    Ok(AppState::new(Arc::new(assistant), index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vector_index::VectorIndexProvider;

    #[test]
    fn test_build_app_state_in_memory() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        config.vector_index.provider = VectorIndexProvider::InMemory;

        let state = build_app_state(&config).unwrap();
        assert_eq!(state.index.provider_type(), "in_memory");
        assert_eq!(state.assistant.step_budget(), config.pipeline.step_budget);
    }
}
