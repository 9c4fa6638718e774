//! Corrective grading domain
//!
//! Retrieved passages are graded for relevance and dropped when they fail;
//! generations are graded for groundedness, then for whether they resolve the
//! question.

mod grade;
mod grader;

pub use grade::{BinaryGrade, GenerationVerdict};
pub use grader::{AnswerGrader, DocumentGrader};
