//! LLM-based passage relevance grader
//!
//! Each passage is one independent yes/no classification call. Calls can
//! run concurrently; survivors keep their retrieval order.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::crag::{BinaryGrade, DocumentGrader};
use crate::domain::llm::{object_schema, StructuredOutput};
use crate::domain::DomainError;
use crate::infrastructure::assistant::prompts::ChatPrompt;
use crate::infrastructure::llm::ModelClient;

/// Structured reply of the passage relevance check
#[derive(Debug, Deserialize)]
pub struct GradeDocuments {
    pub binary_score: String,
}

impl StructuredOutput for GradeDocuments {
    const NAME: &'static str = "grade_documents";

    fn json_schema() -> serde_json::Value {
        object_schema(serde_json::json!({
            "binary_score": {
                "type": "string",
                "enum": ["yes", "no"],
                "description": "Documents are relevant to the question, 'yes' or 'no'"
            }
        }))
    }
}

/// Document grader backed by a model client
#[derive(Debug, Clone)]
pub struct LlmDocumentGrader {
    client: ModelClient,
    prompt: ChatPrompt,
    concurrency: usize,
}

impl LlmDocumentGrader {
    pub fn new(client: ModelClient, prompt: ChatPrompt) -> Self {
        Self {
            client,
            prompt,
            concurrency: 1,
        }
    }

    /// Grade up to `concurrency` passages at once; 1 is sequential
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

#[async_trait]
impl DocumentGrader for LlmDocumentGrader {
    async fn grade_document(
        &self,
        question: &str,
        document: &str,
    ) -> Result<BinaryGrade, DomainError> {
        let messages = self
            .prompt
            .render(&[("question", question), ("document", document)])?;

        let reply: GradeDocuments = self.client.invoke_structured(messages).await?;
        Ok(BinaryGrade::from_score(&reply.binary_score))
    }

    async fn filter_documents(
        &self,
        question: &str,
        documents: Vec<String>,
    ) -> Result<Vec<String>, DomainError> {
        debug!(
            documents = documents.len(),
            concurrency = self.concurrency,
            "Grading documents"
        );

        let futures: Vec<_> = documents
            .iter()
            .enumerate()
            .map(|(index, document)| async move {
                let grade = self.grade_document(question, document).await;
                if let Ok(ref g) = grade {
                    info!(doc = index + 1, grade = ?g, "Document graded");
                }
                grade
            })
            .collect();

        let grades: Vec<Result<BinaryGrade, DomainError>> = stream::iter(futures)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut kept = Vec::with_capacity(documents.len());
        for (document, grade) in documents.into_iter().zip(grades) {
            if grade?.is_yes() {
                kept.push(document);
            }
        }

        Ok(kept)
    }
}
