//! Corrective grading implementations

mod answer_grader;
mod llm_grader;

pub use answer_grader::{GradeAnswer, GradeGroundedness, LlmAnswerGrader};
pub use llm_grader::{GradeDocuments, LlmDocumentGrader};
