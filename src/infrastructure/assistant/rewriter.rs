//! Query rewriting for another retrieval attempt

use serde::Deserialize;
use tracing::{info, warn};

use super::prompts::TRANSFORM_QUERY;
use crate::domain::llm::{object_schema, StructuredOutput};
use crate::domain::DomainError;
use crate::infrastructure::llm::ModelClient;

#[derive(Debug, Deserialize)]
pub struct Rewritten {
    pub question: String,
}

impl StructuredOutput for Rewritten {
    const NAME: &'static str = "transform_query";

    fn json_schema() -> serde_json::Value {
        object_schema(serde_json::json!({
            "question": {
                "type": "string",
                "description": "The rewritten question"
            }
        }))
    }
}

#[derive(Debug, Clone)]
pub struct QueryRewriter {
    client: ModelClient,
}

impl QueryRewriter {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Rephrase the question; a blank rewrite keeps the current one
    pub async fn rewrite(&self, question: &str) -> Result<String, DomainError> {
        let messages = TRANSFORM_QUERY.render(&[("question", question)])?;
        let reply: Rewritten = self.client.invoke_structured(messages).await?;

        let rewritten = reply.question.trim();
        if rewritten.is_empty() {
            warn!(question = %question, "Rewriter returned an empty question, keeping the current one");
            return Ok(question.to_string());
        }

        info!(from = %question, to = %rewritten, "Question rewritten");
        Ok(rewritten.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::infrastructure::llm::ModelSettings;
    use std::sync::Arc;

    fn rewriter(provider: MockLlmProvider) -> QueryRewriter {
        QueryRewriter::new(ModelClient::new(Arc::new(provider), ModelSettings::default()))
    }

    #[tokio::test]
    async fn test_rewrite() {
        let provider = MockLlmProvider::new("mock").on(
            "transform_query",
            r#"{"question": "소프트웨어학과 3학년 권장 이수 과목은 무엇인가요?"}"#,
        );

        let rewritten = rewriter(provider).rewrite("SW 3학년 뭐 들어?").await.unwrap();
        assert_eq!(rewritten, "소프트웨어학과 3학년 권장 이수 과목은 무엇인가요?");
    }

    #[tokio::test]
    async fn test_blank_rewrite_keeps_question() {
        let provider = MockLlmProvider::new("mock").on("transform_query", r#"{"question": "  "}"#);

        let rewritten = rewriter(provider).rewrite("원래 질문").await.unwrap();
        assert_eq!(rewritten, "원래 질문");
    }
}
