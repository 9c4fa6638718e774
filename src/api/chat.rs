//! Chat endpoints

use axum::extract::{Path, State};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, ChatRequest, ChatResponse, Json, ThreadHistoryResponse};
use crate::domain::session::ThreadId;

/// POST /chat
///
/// Every outcome other than a validation error answers with 200. Filtered,
/// exhausted and failed runs carry their fixed message.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("query must not be empty").with_param("query"));
    }

    let thread = match request.thread_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => ThreadId::new(id),
        _ => ThreadId::generate(),
    };

    let reply = state.assistant.run_pipeline(query, &thread).await;
    debug!(thread_id = %reply.thread_id, outcome = reply.outcome.as_str(), "Chat answered");

    Ok(Json(ChatResponse {
        response: reply.answer,
        thread_id: reply.thread_id,
    }))
}

/// GET /threads/{thread_id}
pub async fn thread_history(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<Json<ThreadHistoryResponse>, ApiError> {
    let thread = ThreadId::new(thread_id);
    let turns = state.assistant.history(&thread).await?;

    if turns.is_empty() {
        return Err(ApiError::not_found(format!("Thread '{}' not found", thread)));
    }

    Ok(Json(ThreadHistoryResponse {
        thread_id: thread,
        turns,
    }))
}
