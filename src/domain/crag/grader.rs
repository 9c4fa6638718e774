//! Grading traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::grade::{BinaryGrade, GenerationVerdict};
use crate::domain::DomainError;

/// Binary relevance grading of a single passage
#[async_trait]
pub trait DocumentGrader: Send + Sync + Debug {
    async fn grade_document(&self, question: &str, document: &str)
        -> Result<BinaryGrade, DomainError>;

    /// Keep the passages graded relevant, in their original order
    async fn filter_documents(
        &self,
        question: &str,
        documents: Vec<String>,
    ) -> Result<Vec<String>, DomainError>;
}

/// Two-stage grading of a generation
#[async_trait]
pub trait AnswerGrader: Send + Sync + Debug {
    async fn grade_generation(
        &self,
        question: &str,
        documents: &[String],
        generation: &str,
    ) -> Result<GenerationVerdict, DomainError>;
}
