//! Inappropriate-question filter and domain classification

use serde::Deserialize;
use tracing::info;

use super::prompts::{QUERY_FILTER, ROUTE_QUERY};
use crate::domain::llm::{object_schema, StructuredOutput};
use crate::domain::routing::QueryDomain;
use crate::domain::DomainError;
use crate::infrastructure::llm::ModelClient;

#[derive(Debug, Deserialize)]
pub struct QueryFilterOutput {
    pub inappropriate: bool,
}

impl StructuredOutput for QueryFilterOutput {
    const NAME: &'static str = "query_filter";

    fn json_schema() -> serde_json::Value {
        object_schema(serde_json::json!({
            "inappropriate": {
                "type": "boolean",
                "description": "True if the question is inappropriate, biased or socially sensitive"
            }
        }))
    }
}

/// Domain label; unknown labels resolve to `other`
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub domain: String,
}

impl StructuredOutput for RouteQuery {
    const NAME: &'static str = "route_query";

    fn json_schema() -> serde_json::Value {
        let labels: Vec<&str> = QueryDomain::ALL.iter().map(QueryDomain::as_str).collect();
        object_schema(serde_json::json!({
            "domain": {
                "type": "string",
                "enum": labels,
                "description": "The domain that best matches the user question"
            }
        }))
    }
}

#[derive(Debug, Clone)]
pub struct QueryRouter {
    client: ModelClient,
}

impl QueryRouter {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// True when the question should be refused without routing
    pub async fn filter_inappropriate(&self, question: &str) -> Result<bool, DomainError> {
        let messages = QUERY_FILTER.render(&[("question", question)])?;
        let reply: QueryFilterOutput = self.client.invoke_structured(messages).await?;

        info!(inappropriate = reply.inappropriate, "Question filtered");
        Ok(reply.inappropriate)
    }

    /// Classify the question into one of the known domains
    pub async fn classify_domain(&self, question: &str) -> Result<QueryDomain, DomainError> {
        let messages = ROUTE_QUERY.render(&[("question", question)])?;
        let reply: RouteQuery = self.client.invoke_structured(messages).await?;

        let domain = QueryDomain::from_label(&reply.domain);
        info!(label = %reply.domain, domain = %domain, "Question routed");
        Ok(domain)
    }
}
