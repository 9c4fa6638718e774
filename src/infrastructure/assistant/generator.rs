//! Answer generation from graded documents

use tracing::debug;

use super::prompts::ChatPrompt;
use crate::domain::DomainError;
use crate::infrastructure::llm::ModelClient;

#[derive(Debug, Clone)]
pub struct AnswerGenerator {
    client: ModelClient,
    prompt: ChatPrompt,
    document_separator: &'static str,
}

impl AnswerGenerator {
    pub fn new(client: ModelClient, prompt: ChatPrompt, document_separator: &'static str) -> Self {
        Self {
            client,
            prompt,
            document_separator,
        }
    }

    /// Answer the question from the documents joined into one context block.
    ///
    /// Callers route empty document sets to the rewriter; reaching here with
    /// none is a validation error.
    pub async fn generate(&self, question: &str, documents: &[String]) -> Result<String, DomainError> {
        if documents.is_empty() {
            return Err(DomainError::validation("generation requires at least one document"));
        }

        let context = documents.join(self.document_separator);
        debug!(documents = documents.len(), context_chars = context.chars().count(), "Generating answer");

        let messages = self
            .prompt
            .render(&[("documents", &context), ("question", question)])?;
        self.client.invoke_text(messages).await
    }
}
