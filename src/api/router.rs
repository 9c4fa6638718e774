use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{chat, corpus, health};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Assistant
        .route("/chat", post(chat::chat))
        .route("/threads/{thread_id}", get(chat::thread_history))
        // Corpus administration
        .route(
            "/data/{domain}",
            post(corpus::ingest).delete(corpus::delete_domain),
        )
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
