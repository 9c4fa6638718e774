//! Qdrant vector index over the REST API

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::Embedder;
use crate::domain::vector_index::{
    FilterCondition, FilterConnector, FilterOperator, FilterValue, MetadataFilter, NewPassage,
    Passage, SearchParams, VectorIndex,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Payload field holding the passage text
const CONTENT_FIELD: &str = "page_content";
/// Payload field holding the passage metadata object
const METADATA_FIELD: &str = "metadata";

/// Qdrant connection settings
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Qdrant-backed vector index
#[derive(Debug)]
pub struct QdrantVectorIndex<C: HttpClientTrait> {
    client: C,
    config: QdrantConfig,
    embedder: Embedder,
    collection_ready: OnceCell<()>,
}

impl<C: HttpClientTrait> QdrantVectorIndex<C> {
    pub fn new(client: C, config: QdrantConfig, embedder: Embedder) -> Self {
        Self {
            client,
            config,
            embedder,
            collection_ready: OnceCell::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.config.url, self.config.collection)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref key) = self.config.api_key {
            headers.push(("api-key", key.as_str()));
        }
        headers
    }

    /// Create the collection on first use if it does not exist
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        self.collection_ready
            .get_or_try_init(|| async {
                let url = format!("{}/exists", self.collection_url());
                let response: QdrantResponse<ExistsResult> =
                    parse(self.client.get_json(&url, self.headers()).await?)?;

                if !response.result.exists {
                    tracing::info!(
                        collection = %self.config.collection,
                        dimensions = self.embedder.dimensions(),
                        "Creating Qdrant collection"
                    );

                    let body = json!({
                        "vectors": {
                            "size": self.embedder.dimensions(),
                            "distance": "Cosine"
                        }
                    });
                    self.client
                        .put_json(&self.collection_url(), self.headers(), &body)
                        .await?;
                }

                Ok::<(), DomainError>(())
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndex for QdrantVectorIndex<C> {
    fn provider_type(&self) -> &'static str {
        "qdrant"
    }

    async fn search(&self, params: SearchParams) -> Result<Vec<Passage>, DomainError> {
        self.ensure_collection().await?;

        let vector = self.embedder.embed_query(&params.query).await?;

        let mut body = json!({
            "vector": vector,
            "limit": params.top_k,
            "with_payload": true,
        });

        if let Some(ref filter) = params.filter {
            body["filter"] = to_qdrant_filter(filter);
        }

        tracing::debug!(
            collection = %self.config.collection,
            top_k = params.top_k,
            has_filter = params.filter.is_some(),
            "Searching Qdrant"
        );

        let url = format!("{}/points/search", self.collection_url());
        let response: QdrantResponse<Vec<ScoredPoint>> =
            parse(self.client.post_json(&url, self.headers(), &body).await?)?;

        Ok(response.result.into_iter().map(ScoredPoint::into_passage).collect())
    }

    async fn add_passages(&self, passages: Vec<NewPassage>) -> Result<Vec<String>, DomainError> {
        if passages.is_empty() {
            return Ok(Vec::new());
        }

        self.ensure_collection().await?;

        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let vectors = self.embedder.embed_batch(texts).await?;

        let mut ids = Vec::with_capacity(passages.len());
        let points: Vec<Value> = passages
            .into_iter()
            .zip(vectors)
            .map(|(passage, vector)| {
                let id = passage.id.unwrap_or_else(|| Uuid::new_v4().to_string());
                ids.push(id.clone());
                json!({
                    "id": point_id(&id),
                    "vector": vector,
                    "payload": {
                        CONTENT_FIELD: passage.content,
                        METADATA_FIELD: passage.metadata,
                    }
                })
            })
            .collect();

        let url = format!("{}/points?wait=true", self.collection_url());
        self.client
            .put_json(&url, self.headers(), &json!({ "points": points }))
            .await?;

        tracing::info!(
            collection = %self.config.collection,
            count = ids.len(),
            "Upserted passages"
        );

        Ok(ids)
    }

    async fn delete_by_filter(&self, filter: MetadataFilter) -> Result<Option<usize>, DomainError> {
        self.ensure_collection().await?;

        let url = format!("{}/points/delete?wait=true", self.collection_url());
        let body = json!({ "filter": to_qdrant_filter(&filter) });
        self.client.post_json(&url, self.headers(), &body).await?;

        // Qdrant does not report how many points a filter delete removed
        Ok(None)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let url = format!("{}/collections", self.config.url);
        match self.client.get_json(&url, self.headers()).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Qdrant health check failed");
                Ok(false)
            }
        }
    }
}

/// Unsigned integer ids go out as numbers, everything else as a UUID string
fn point_id(id: &str) -> Value {
    match id.parse::<u64>() {
        Ok(number) => json!(number),
        Err(_) => json!(id),
    }
}

/// Translate a metadata filter into a Qdrant filter object
fn to_qdrant_filter(filter: &MetadataFilter) -> Value {
    match filter {
        MetadataFilter::Condition(c) if c.operator == FilterOperator::Ne => {
            json!({ "must_not": [field_condition(c)] })
        }
        MetadataFilter::Condition(c) => json!({ "must": [field_condition(c)] }),
        MetadataFilter::Group { connector, filters } => {
            let clauses: Vec<Value> = filters.iter().map(to_qdrant_clause).collect();
            match connector {
                FilterConnector::And => json!({ "must": clauses }),
                FilterConnector::Or => json!({ "should": clauses }),
            }
        }
    }
}

fn to_qdrant_clause(filter: &MetadataFilter) -> Value {
    match filter {
        MetadataFilter::Condition(c) if c.operator != FilterOperator::Ne => field_condition(c),
        other => to_qdrant_filter(other),
    }
}

fn field_condition(condition: &FilterCondition) -> Value {
    let key = format!("{}.{}", METADATA_FIELD, condition.key);
    let matcher = match &condition.value {
        FilterValue::List(values) => json!({ "any": values }),
        FilterValue::String(value) => json!({ "value": value }),
    };

    json!({ "key": key, "match": matcher })
}

fn parse<T: for<'de> Deserialize<'de>>(json: Value) -> Result<T, DomainError> {
    serde_json::from_value(json)
        .map_err(|e| DomainError::vector_index(format!("Failed to parse Qdrant response: {}", e)))
}

// Qdrant API types

#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct ExistsResult {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Map<String, Value>>,
}

impl ScoredPoint {
    fn into_passage(self) -> Passage {
        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };

        let mut payload = self.payload.unwrap_or_default();
        let content = match payload.remove(CONTENT_FIELD) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let metadata = match payload.remove(METADATA_FIELD) {
            Some(Value::Object(map)) => map.into_iter().collect(),
            _ => Default::default(),
        };

        Passage {
            id,
            content,
            score: self.score,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::vector_index::{BATCH_KEY, DEPARTMENT_KEY, DOMAIN_KEY};
    use crate::infrastructure::llm::HttpClient;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTION: &str = "ajou_documents";

    fn index(server: &MockServer) -> QdrantVectorIndex<HttpClient> {
        let embedder = Embedder::new(Arc::new(MockEmbeddingProvider::new(4)), "mock", 4);
        QdrantVectorIndex::new(
            HttpClient::new(),
            QdrantConfig::new(server.uri(), COLLECTION),
            embedder,
        )
    }

    async fn mount_existing_collection(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(format!("/collections/{}/exists", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "exists": true }, "status": "ok", "time": 0.0
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_filter_translation() {
        let filter = MetadataFilter::and(vec![
            MetadataFilter::condition(FilterCondition::eq(DOMAIN_KEY, "course")),
            MetadataFilter::condition(FilterCondition::eq(DEPARTMENT_KEY, "소프트웨어학과")),
        ]);

        assert_eq!(
            to_qdrant_filter(&filter),
            json!({
                "must": [
                    { "key": "metadata.domain", "match": { "value": "course" } },
                    { "key": "metadata.department", "match": { "value": "소프트웨어학과" } }
                ]
            })
        );

        let ne = MetadataFilter::condition(FilterCondition::ne(DOMAIN_KEY, "other"));
        assert_eq!(
            to_qdrant_filter(&ne),
            json!({ "must_not": [{ "key": "metadata.domain", "match": { "value": "other" } }] })
        );
    }

    #[test]
    fn test_stale_batch_filter_nests_must_not() {
        let stale = MetadataFilter::and(vec![
            MetadataFilter::condition(FilterCondition::eq(DOMAIN_KEY, "course")),
            MetadataFilter::condition(FilterCondition::ne(BATCH_KEY, "b-2")),
        ]);

        assert_eq!(
            to_qdrant_filter(&stale),
            json!({
                "must": [
                    { "key": "metadata.domain", "match": { "value": "course" } },
                    { "must_not": [{ "key": "metadata.ingest_batch", "match": { "value": "b-2" } }] }
                ]
            })
        );
    }

    #[test]
    fn test_point_id_keeps_integers_numeric() {
        assert_eq!(point_id("42"), json!(42));
        assert_eq!(
            point_id("5c56c793-69f3-4fbf-87e6-c4bf54c28c26"),
            json!("5c56c793-69f3-4fbf-87e6-c4bf54c28c26")
        );
    }

    #[tokio::test]
    async fn test_search_sends_scoped_filter() {
        let server = MockServer::start().await;
        mount_existing_collection(&server).await;

        Mock::given(method("POST"))
            .and(path(format!("/collections/{}/points/search", COLLECTION)))
            .and(body_partial_json(json!({
                "limit": 5,
                "filter": { "must": [{ "key": "metadata.domain", "match": { "value": "curriculum" } }] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{
                    "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                    "version": 1,
                    "score": 0.91,
                    "payload": {
                        "page_content": "졸업학점 130",
                        "metadata": { "domain": "curriculum", "department": "소프트웨어학과" }
                    }
                }],
                "status": "ok",
                "time": 0.001
            })))
            .mount(&server)
            .await;

        let index = index(&server);
        let filter = MetadataFilter::and(vec![MetadataFilter::condition(FilterCondition::eq(
            DOMAIN_KEY,
            "curriculum",
        ))]);

        let results = index
            .search(SearchParams::new("졸업").with_top_k(5).with_filter(filter.clone()))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "졸업학점 130");
        assert_eq!(results[0].department(), Some("소프트웨어학과"));

        // Collection existence is checked once
        index
            .search(SearchParams::new("졸업").with_top_k(5).with_filter(filter))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_creates_missing_collection_before_upsert() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/collections/{}/exists", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "exists": false }, "status": "ok"
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(format!("/collections/{}", COLLECTION)))
            .and(body_partial_json(json!({ "vectors": { "size": 4, "distance": "Cosine" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": true, "status": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(format!("/collections/{}/points", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "operation_id": 1, "status": "completed" }, "status": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = index(&server)
            .add_passages(vec![
                NewPassage::new("학과 소개").with_metadata(DOMAIN_KEY, "department_intro")
            ])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let server = MockServer::start().await;
        mount_existing_collection(&server).await;

        Mock::given(method("POST"))
            .and(path(format!("/collections/{}/points/delete", COLLECTION)))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = index(&server)
            .delete_by_filter(MetadataFilter::condition(FilterCondition::eq(DOMAIN_KEY, "course")))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_check_reports_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!index(&server).health_check().await.unwrap());
    }
}
