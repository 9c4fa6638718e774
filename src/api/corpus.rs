//! Corpus administration: replace-by-domain ingestion of pre-chunked passages

use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use super::state::AppState;
use super::types::{ApiError, DeleteResponse, IngestRequest, IngestResponse, Json, PassageInput};
use crate::domain::routing::QueryDomain;
use crate::domain::vector_index::{FilterCondition, MetadataFilter, BATCH_KEY, DOMAIN_KEY};

/// POST /data/{domain}
///
/// With `replace`, the new passages are stored first and the domain's older
/// passages are removed only once that succeeded.
pub async fn ingest(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let domain = parse_domain(&domain)?;
    validate_passages(&request.passages)?;

    let batch = Uuid::new_v4().to_string();
    let passages = request
        .passages
        .into_iter()
        .map(|p| p.into_passage(domain).with_metadata(BATCH_KEY, batch.clone()))
        .collect();
    let ids = state.index.add_passages(passages).await?;

    info!(domain = %domain, batch = %batch, count = ids.len(), "Passages ingested");

    if request.replace {
        let stale = MetadataFilter::and(vec![
            domain_filter(domain),
            MetadataFilter::condition(FilterCondition::ne(BATCH_KEY, batch.as_str())),
        ]);
        let deleted = state.index.delete_by_filter(stale).await?;
        info!(domain = %domain, deleted = ?deleted, "Replaced existing passages");
    }

    Ok(Json(IngestResponse {
        domain,
        count: ids.len(),
        ids,
    }))
}

/// DELETE /data/{domain}
pub async fn delete_domain(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let domain = parse_domain(&domain)?;
    let deleted = state.index.delete_by_filter(domain_filter(domain)).await?;

    info!(domain = %domain, deleted = ?deleted, "Domain passages deleted");
    Ok(Json(DeleteResponse { domain, deleted }))
}

fn parse_domain(raw: &str) -> Result<QueryDomain, ApiError> {
    match raw.parse::<QueryDomain>() {
        Ok(domain) if domain.is_answerable() => Ok(domain),
        _ => Err(ApiError::bad_request(format!("Unknown corpus domain '{}'", raw)).with_param("domain")),
    }
}

fn validate_passages(passages: &[PassageInput]) -> Result<(), ApiError> {
    if passages.iter().any(|p| p.content.trim().is_empty()) {
        return Err(ApiError::bad_request("passage content must not be empty").with_param("passages"));
    }

    if let Some(id) = passages.iter().filter_map(|p| p.id.as_deref()).find(|id| !is_point_id(id)) {
        return Err(ApiError::bad_request(format!(
            "passage id '{}' must be a UUID or an unsigned integer",
            id
        ))
        .with_param("passages"));
    }

    Ok(())
}

/// Ids the vector index accepts as point ids
fn is_point_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok() || id.parse::<u64>().is_ok()
}

fn domain_filter(domain: QueryDomain) -> MetadataFilter {
    MetadataFilter::condition(FilterCondition::eq(DOMAIN_KEY, domain.as_str()))
}
