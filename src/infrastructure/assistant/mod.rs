//! University information assistant
//!
//! A router filters and classifies each question, then hands it to the
//! corrective retrieval pipeline of its domain.

mod extractor;
mod formatter;
mod generator;
mod orchestrator;
mod pipeline;
pub mod prompts;
mod retriever;
mod rewriter;
mod router;

pub use extractor::{DepartmentClassified, DepartmentExtracted, DepartmentExtractor, Extraction};
pub use formatter::format_passages;
pub use generator::AnswerGenerator;
pub use orchestrator::{Assistant, AssistantReply};
pub use pipeline::{DomainPipeline, PipelineRun};
pub use retriever::Retriever;
pub use rewriter::{QueryRewriter, Rewritten};
pub use router::{QueryFilterOutput, QueryRouter, RouteQuery};
