//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = match configure_buckets(PrometheusBuilder::new(), config) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!("Invalid metrics buckets: {}", e);
            return None;
        }
    };

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn configure_buckets(
    builder: PrometheusBuilder,
    config: &MetricsConfig,
) -> Result<PrometheusBuilder, BuildError> {
    builder
        .set_buckets_for_metric(
            Matcher::Full("assistant_invocation_steps".to_string()),
            &config.step_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("assistant_invocation_duration_seconds".to_string()),
            &config.duration_buckets,
        )
}

fn register_default_metrics() {
    gauge!("major_mate_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let status_str = status.to_string();
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status_str),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    // Track 5xx errors separately
    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record an LLM request metric
pub fn record_llm_request(params: LlmRequestMetricParams) {
    let labels = [
        ("provider", params.provider.to_string()),
        ("model", params.model.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(params.duration.as_secs_f64());

    if let Some(tokens) = params.input_tokens {
        counter!("llm_input_tokens_total", &labels).increment(tokens);
    }

    if let Some(tokens) = params.output_tokens {
        counter!("llm_output_tokens_total", &labels).increment(tokens);
    }

    if !params.success {
        counter!("llm_errors_total", &labels).increment(1);
    }
}

/// Record a node executed by the router or a domain pipeline
pub fn record_node_execution(domain: &str, node: &str) {
    counter!(
        "assistant_node_executions_total",
        "domain" => domain.to_string(),
        "node" => node.to_string()
    )
    .increment(1);
}

/// Record how an assistant invocation ended
pub fn record_pipeline_outcome(domain: &str, outcome: &str, steps: usize, duration: Duration) {
    let labels = [
        ("domain", domain.to_string()),
        ("outcome", outcome.to_string()),
    ];

    counter!("assistant_invocations_total", &labels).increment(1);
    histogram!("assistant_invocation_steps", &labels).record(steps as f64);
    histogram!("assistant_invocation_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Parameters for LLM request metrics
pub struct LlmRequestMetricParams<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub duration: Duration,
    pub success: bool,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static NUMERIC_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\d+(/|$)").expect("numeric id pattern is valid")
});

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_PATTERN.replace_all(path, "{id}");
    let path = NUMERIC_ID_PATTERN.replace_all(&path, "/{id}$1");

    // Truncate long paths
    path.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/threads/550e8400-e29b-41d4-a716-446655440000";
        let sanitized = sanitize_path(path);
        assert_eq!(sanitized, "/threads/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        let path = "/data/123/passages";
        let sanitized = sanitize_path(path);
        assert_eq!(sanitized, "/data/{id}/passages");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        let path = "/health";
        let sanitized = sanitize_path(path);
        assert_eq!(sanitized, "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        let sanitized = sanitize_path(path);
        assert!(sanitized.len() <= 50);
    }

    #[test]
    fn test_sanitize_path_truncates_on_char_boundary() {
        let path = format!("/threads/{}", "학".repeat(60));
        let sanitized = sanitize_path(&path);
        assert_eq!(sanitized.chars().count(), 50);
    }

    #[test]
    fn test_configure_buckets_rejects_empty() {
        let config = MetricsConfig {
            step_buckets: Vec::new(),
            ..Default::default()
        };

        assert!(configure_buckets(PrometheusBuilder::new(), &config).is_err());
        assert!(configure_buckets(PrometheusBuilder::new(), &MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_node_execution("course", "retrieve");
        record_pipeline_outcome("course", "answered", 7, Duration::from_millis(20));
    }
}
