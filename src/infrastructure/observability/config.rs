//! Observability configuration

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// OTLP gRPC endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of traces kept, clamped to 0.0..=1.0
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "major-mate".to_string(),
            sampling_ratio: 1.0,
        }
    }
}

/// How traces are sampled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingMode {
    Always,
    Never,
    Ratio(f64),
}

impl TracingConfig {
    pub fn sampling_mode(&self) -> SamplingMode {
        if self.sampling_ratio >= 1.0 {
            SamplingMode::Always
        } else if self.sampling_ratio <= 0.0 || self.sampling_ratio.is_nan() {
            SamplingMode::Never
        } else {
            SamplingMode::Ratio(self.sampling_ratio)
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text
    pub path: String,
    /// Buckets of the per-invocation node count histogram
    pub step_buckets: Vec<f64>,
    /// Buckets, in seconds, of the per-invocation latency histogram
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
            step_buckets: vec![1.0, 2.0, 4.0, 7.0, 10.0, 13.0, 15.0, 20.0],
            duration_buckets: vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 60.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObservabilityConfig::default();

        assert!(!config.tracing.enabled);
        assert_eq!(config.tracing.service_name, "major-mate");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");
        assert!(config.metrics.step_buckets.contains(&15.0));
    }

    #[test]
    fn test_sampling_mode() {
        let mut config = TracingConfig::default();
        assert_eq!(config.sampling_mode(), SamplingMode::Always);

        config.sampling_ratio = 0.25;
        assert_eq!(config.sampling_mode(), SamplingMode::Ratio(0.25));

        config.sampling_ratio = -1.0;
        assert_eq!(config.sampling_mode(), SamplingMode::Never);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: MetricsConfig = serde_json::from_str(r#"{"path": "/internal/metrics"}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.path, "/internal/metrics");
        assert_eq!(config.step_buckets, MetricsConfig::default().step_buckets);
    }
}
