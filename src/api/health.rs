//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::routing::QueryDomain;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// GET /health - process is up
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready
///
/// Unhealthy (503) when the vector index does not answer. Degraded when an
/// answerable domain has no pipeline.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![check_vector_index(&state).await, check_pipelines(&state)];
    let overall_status = worst_status(&checks);

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_vector_index(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let name = format!("vector_index:{}", state.index.provider_type());

    let (status, message) = match state.index.health_check().await {
        Ok(true) => (HealthStatus::Healthy, None),
        Ok(false) => (HealthStatus::Unhealthy, Some("vector index unreachable".to_string())),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name,
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

fn check_pipelines(state: &AppState) -> HealthCheck {
    let missing: Vec<&str> = QueryDomain::ALL
        .into_iter()
        .filter(|d| d.is_answerable() && state.assistant.dispatch(*d).is_none())
        .map(|d| d.as_str())
        .collect();

    let (status, message) = if missing.is_empty() {
        (HealthStatus::Healthy, None)
    } else {
        (
            HealthStatus::Degraded,
            Some(format!("no pipeline for: {}", missing.join(", "))),
        )
    };

    HealthCheck {
        name: "pipelines".to_string(),
        status,
        message,
        latency_ms: None,
    }
}

fn worst_status(checks: &[HealthCheck]) -> HealthStatus {
    checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::infrastructure::assistant::{Assistant, QueryRouter};
    use crate::infrastructure::llm::{ModelClient, ModelSettings};
    use crate::infrastructure::session::InMemorySessionStore;
    use crate::infrastructure::vector_index::{Embedder, InMemoryVectorIndex};

    fn check(status: HealthStatus) -> HealthCheck {
        HealthCheck {
            name: "x".to_string(),
            status,
            message: None,
            latency_ms: None,
        }
    }

    #[test]
    fn test_worst_status_wins() {
        assert_eq!(worst_status(&[]), HealthStatus::Healthy);
        assert_eq!(
            worst_status(&[check(HealthStatus::Healthy), check(HealthStatus::Degraded)]),
            HealthStatus::Degraded
        );
        assert_eq!(
            worst_status(&[check(HealthStatus::Unhealthy), check(HealthStatus::Degraded)]),
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn test_health_response_omits_empty_checks() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "0.1.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(!json.contains("checks"));
    }

    #[tokio::test]
    async fn test_pipelines_check_reports_missing_domains() {
        let embedder = Embedder::new(Arc::new(MockEmbeddingProvider::new(4)), "mock", 4);
        let index = Arc::new(InMemoryVectorIndex::new(embedder));
        let client = ModelClient::new(Arc::new(MockLlmProvider::new("mock")), ModelSettings::default());
        let assistant = Assistant::new(
            QueryRouter::new(client),
            Vec::new(),
            Arc::new(InMemorySessionStore::new()),
            15,
        );
        let state = AppState::new(Arc::new(assistant), index);

        let result = check_pipelines(&state);
        assert_eq!(result.status, HealthStatus::Degraded);
        assert_eq!(
            result.message.as_deref(),
            Some("no pipeline for: course, curriculum, department_intro, employment_status")
        );

        assert_eq!(check_vector_index(&state).await.status, HealthStatus::Healthy);
    }
}
