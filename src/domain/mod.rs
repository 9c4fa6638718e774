//! Domain layer - Core business logic and entities

pub mod crag;
pub mod department;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod routing;
pub mod session;
pub mod vector_index;

pub use crag::{AnswerGrader, BinaryGrade, DocumentGrader, GenerationVerdict};
pub use department::{Department, DepartmentCheck, DepartmentMention, DepartmentScope};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use llm::{
    LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, StructuredOutput,
};
pub use pipeline::{
    DepartmentPolicy, NodeKind, PipelineError, PipelineProfile, RouterState, RunOutcome,
    StepBudget, WorkingState,
};
pub use routing::QueryDomain;
pub use session::{SessionStore, ThreadId, Turn};
pub use vector_index::{MetadataFilter, NewPassage, Passage, SearchParams, VectorIndex};
