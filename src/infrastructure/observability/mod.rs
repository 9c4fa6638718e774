//! Observability infrastructure - tracing export and Prometheus metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, SamplingMode, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_llm_request,
    record_node_execution, record_pipeline_outcome, LlmRequestMetricParams, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
