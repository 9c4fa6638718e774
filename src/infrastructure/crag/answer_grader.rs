//! Two-stage generation grader: groundedness, then question resolution

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domain::crag::{AnswerGrader, BinaryGrade, GenerationVerdict};
use crate::domain::llm::{object_schema, StructuredOutput};
use crate::domain::DomainError;
use crate::infrastructure::assistant::prompts::ChatPrompt;
use crate::infrastructure::llm::ModelClient;

fn binary_score_schema() -> serde_json::Value {
    object_schema(serde_json::json!({
        "binary_score": { "type": "string", "enum": ["yes", "no"] }
    }))
}

/// Is the generation supported by the passages
#[derive(Debug, Deserialize)]
pub struct GradeGroundedness {
    pub binary_score: String,
}

impl StructuredOutput for GradeGroundedness {
    const NAME: &'static str = "grade_groundedness";

    fn json_schema() -> serde_json::Value {
        binary_score_schema()
    }
}

/// Does the generation resolve the question
#[derive(Debug, Deserialize)]
pub struct GradeAnswer {
    pub binary_score: String,
}

impl StructuredOutput for GradeAnswer {
    const NAME: &'static str = "grade_answer";

    fn json_schema() -> serde_json::Value {
        binary_score_schema()
    }
}

#[derive(Debug, Clone)]
pub struct LlmAnswerGrader {
    client: ModelClient,
    groundedness: ChatPrompt,
    resolution: ChatPrompt,
    document_separator: &'static str,
}

impl LlmAnswerGrader {
    pub fn new(
        client: ModelClient,
        groundedness: ChatPrompt,
        resolution: ChatPrompt,
        document_separator: &'static str,
    ) -> Self {
        Self {
            client,
            groundedness,
            resolution,
            document_separator,
        }
    }
}

#[async_trait]
impl AnswerGrader for LlmAnswerGrader {
    async fn grade_generation(
        &self,
        question: &str,
        documents: &[String],
        generation: &str,
    ) -> Result<GenerationVerdict, DomainError> {
        let joined = documents.join(self.document_separator);
        let messages = self
            .groundedness
            .render(&[("documents", &joined), ("generation", generation)])?;

        let grounded: GradeGroundedness = self.client.invoke_structured(messages).await?;
        let grounded = BinaryGrade::from_score(&grounded.binary_score);
        info!(grade = ?grounded, "Groundedness graded");

        if !grounded.is_yes() {
            return Ok(GenerationVerdict::Hallucination);
        }

        let messages = self
            .resolution
            .render(&[("question", question), ("generation", generation)])?;

        let resolved: GradeAnswer = self.client.invoke_structured(messages).await?;
        let resolved = BinaryGrade::from_score(&resolved.binary_score);
        info!(grade = ?resolved, "Resolution graded");

        Ok(if resolved.is_yes() {
            GenerationVerdict::Relevant
        } else {
            GenerationVerdict::NotRelevant
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::infrastructure::llm::ModelSettings;
    use std::sync::Arc;

    const GROUNDED: ChatPrompt = ChatPrompt::new("grounded?", "${documents} / ${generation}");
    const RESOLVED: ChatPrompt = ChatPrompt::new("resolved?", "${question} / ${generation}");

    fn grader(provider: Arc<MockLlmProvider>) -> LlmAnswerGrader {
        let client = ModelClient::new(provider, ModelSettings::default().with_max_retries(0));
        LlmAnswerGrader::new(client, GROUNDED, RESOLVED, "\n\n")
    }

    fn docs() -> Vec<String> {
        vec!["졸업학점 130".to_string()]
    }

    #[tokio::test]
    async fn test_ungrounded_skips_resolution() {
        let provider = Arc::new(
            MockLlmProvider::new("mock").on(GradeGroundedness::NAME, r#"{"binary_score": "no"}"#),
        );

        let verdict = grader(provider.clone())
            .grade_generation("졸업학점?", &docs(), "140학점입니다")
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::Hallucination);
        assert_eq!(provider.calls_for(GradeAnswer::NAME), 0);
    }

    #[tokio::test]
    async fn test_grounded_and_resolved() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .on(GradeGroundedness::NAME, r#"{"binary_score": "yes"}"#)
                .on(GradeAnswer::NAME, r#"{"binary_score": "yes"}"#),
        );

        let verdict = grader(provider)
            .grade_generation("졸업학점?", &docs(), "130학점입니다")
            .await
            .unwrap();
        assert_eq!(verdict, GenerationVerdict::Relevant);
    }

    #[tokio::test]
    async fn test_grounded_but_unresolved() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .on(GradeGroundedness::NAME, r#"{"binary_score": "yes"}"#)
                .on(GradeAnswer::NAME, r#"{"binary_score": "no"}"#),
        );

        let verdict = grader(provider.clone())
            .grade_generation("졸업학점?", &docs(), "학점 정보가 있습니다")
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::NotRelevant);
        let requests = provider.requests();
        assert!(requests[0].messages[1].content.contains("졸업학점 130"));
        assert!(requests[1].messages[1].content.contains("졸업학점?"));
    }
}
