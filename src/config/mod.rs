//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, LlmConfig, LogFormat, LoggingConfig, PipelineConfig,
    RetrievalOverride, ServerConfig, VectorIndexConfig,
};
