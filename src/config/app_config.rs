use serde::Deserialize;

use crate::domain::pipeline::{DepartmentPolicy, PipelineProfile, RetrievalBudget};
use crate::domain::routing::QueryDomain;
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::vector_index::VectorIndexProvider;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Chat model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

/// Embedding model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorIndexConfig {
    pub provider: VectorIndexProvider,
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Assistant behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Node executions allowed per invocation, router included
    pub step_budget: usize,
    /// Passages graded at once; 1 grades sequentially
    pub grading_concurrency: usize,
    pub department_policy: DepartmentPolicy,
    pub course: RetrievalOverride,
    pub curriculum: RetrievalOverride,
    pub department_intro: RetrievalOverride,
    pub employment_status: RetrievalOverride,
}

/// Per-domain retrieval settings; unset fields keep the domain's default budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetrievalOverride {
    pub k: Option<usize>,
    pub per_department_k: Option<usize>,
}

impl RetrievalOverride {
    /// Override only the fields that are set
    pub fn merged_with(self, base: RetrievalBudget) -> RetrievalBudget {
        RetrievalBudget::new(
            self.k.unwrap_or(base.k),
            self.per_department_k.unwrap_or(base.per_department_k),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl LlmConfig {
    /// Configured key, or `OPENAI_API_KEY` from the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-large".to_string(),
            dimensions: 3072,
        }
    }
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            provider: VectorIndexProvider::Qdrant,
            url: "http://localhost:6333".to_string(),
            collection: "ajou_documents".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_budget: 15,
            grading_concurrency: 1,
            department_policy: DepartmentPolicy::default(),
            course: RetrievalOverride::default(),
            curriculum: RetrievalOverride::default(),
            department_intro: RetrievalOverride::default(),
            employment_status: RetrievalOverride::default(),
        }
    }
}

impl PipelineConfig {
    /// Retrieval budget for a domain; `None` for `Other`
    pub fn retrieval_for(&self, domain: QueryDomain) -> Option<RetrievalBudget> {
        let configured = match domain {
            QueryDomain::Course => self.course,
            QueryDomain::Curriculum => self.curriculum,
            QueryDomain::DepartmentIntro => self.department_intro,
            QueryDomain::EmploymentStatus => self.employment_status,
            QueryDomain::Other => return None,
        };

        let base = PipelineProfile::for_domain(domain)?.retrieval;
        Some(configured.merged_with(base))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.embedding.dimensions, 3072);
        assert_eq!(config.vector_index.collection, "ajou_documents");
        assert_eq!(config.pipeline.step_budget, 15);
        assert_eq!(config.pipeline.grading_concurrency, 1);
        assert_eq!(config.pipeline.department_policy, DepartmentPolicy::Keep);
    }

    #[test]
    fn test_retrieval_budgets() {
        let pipeline = PipelineConfig::default();

        assert_eq!(pipeline.retrieval_for(QueryDomain::Course).unwrap().k, 5);
        assert_eq!(
            pipeline
                .retrieval_for(QueryDomain::EmploymentStatus)
                .unwrap()
                .per_department_k,
            2
        );
        assert!(pipeline.retrieval_for(QueryDomain::Other).is_none());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "pipeline": { "step_budget": 9, "department_policy": "clear" },
            "vector_index": { "provider": "in_memory" }
        }))
        .unwrap();

        assert_eq!(config.pipeline.step_budget, 9);
        assert_eq!(config.pipeline.department_policy, DepartmentPolicy::Clear);
        assert_eq!(config.pipeline.retrieval_for(QueryDomain::Course).unwrap().k, 5);
        assert_eq!(config.vector_index.provider, VectorIndexProvider::InMemory);
        assert_eq!(config.vector_index.url, "http://localhost:6333");
    }

    #[test]
    fn test_single_nested_field_keeps_section_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 9090 },
            "logging": { "format": "json" },
            "pipeline": { "course": { "k": 8 }, "employment_status": { "per_department_k": 3 } }
        }))
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(
            config.pipeline.retrieval_for(QueryDomain::Course),
            Some(RetrievalBudget::new(8, 5))
        );
        assert_eq!(
            config.pipeline.retrieval_for(QueryDomain::EmploymentStatus),
            Some(RetrievalBudget::new(2, 3))
        );
    }

    #[test]
    fn test_env_override_of_one_field() {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("MMTEST")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(
                        [
                            ("MMTEST__SERVER__PORT".to_string(), "9191".to_string()),
                            ("MMTEST__PIPELINE__COURSE__K".to_string(), "7".to_string()),
                        ]
                        .into_iter()
                        .collect(),
                    )),
            )
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pipeline.retrieval_for(QueryDomain::Course), Some(RetrievalBudget::new(7, 5)));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let llm = LlmConfig {
            api_key: Some("sk-configured".to_string()),
            ..Default::default()
        };
        assert_eq!(llm.resolve_api_key().as_deref(), Some("sk-configured"));
    }
}
