//! Corrective retrieval pipeline for one domain
//!
//! ```text
//! extract_department ─┬─> not_supported_department ─> END
//!                     └─> retrieve ─> grade_documents ─┬─> generate ─> grade_generation
//!                            ^                          │       ^              │
//!                            │                          v       └─hallucination┤
//!                            └─────────────────── transform_query <─not relevant┤
//!                                                                   relevant ─> END
//! ```
//!
//! Both cycles are bounded only by the caller's [`StepBudget`].

use std::sync::Arc;

use tracing::info;

use super::extractor::DepartmentExtractor;
use super::formatter::format_passages;
use super::generator::AnswerGenerator;
use super::retriever::Retriever;
use super::rewriter::QueryRewriter;
use crate::domain::crag::{AnswerGrader, DocumentGrader, GenerationVerdict};
use crate::domain::department::DepartmentCheck;
use crate::domain::pipeline::{
    DepartmentPolicy, NodeKind, NodeResultExt, PipelineError, PipelineProfile, RunOutcome,
    StepBudget, WorkingState,
};
use crate::domain::routing::QueryDomain;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_node_execution;

/// Characters of generated text included in log events
const GENERATION_PREVIEW_CHARS: usize = 200;

/// What a node hands back to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Next(NodeKind),
    Finish(RunOutcome),
}

/// Result of a finished pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub generation: String,
    pub outcome: RunOutcome,
    /// Question as it stood when the run finished
    pub final_question: String,
}

#[derive(Debug, Clone)]
pub struct DomainPipeline {
    profile: PipelineProfile,
    extractor: DepartmentExtractor,
    retriever: Retriever,
    document_grader: Arc<dyn DocumentGrader>,
    generator: AnswerGenerator,
    answer_grader: Arc<dyn AnswerGrader>,
    rewriter: QueryRewriter,
}

impl DomainPipeline {
    pub fn new(
        profile: PipelineProfile,
        extractor: DepartmentExtractor,
        retriever: Retriever,
        document_grader: Arc<dyn DocumentGrader>,
        generator: AnswerGenerator,
        answer_grader: Arc<dyn AnswerGrader>,
        rewriter: QueryRewriter,
    ) -> Self {
        Self {
            profile,
            extractor,
            retriever,
            document_grader,
            generator,
            answer_grader,
            rewriter,
        }
    }

    pub fn domain(&self) -> QueryDomain {
        self.profile.domain
    }

    /// Run the state machine, charging `budget` before every node
    pub async fn run(
        &self,
        question: &str,
        budget: &mut StepBudget,
    ) -> Result<PipelineRun, PipelineError> {
        let mut state = WorkingState::new(question);
        let mut node = NodeKind::ExtractDepartment;

        loop {
            budget.charge(node)?;
            record_node_execution(self.profile.domain.as_str(), node.as_str());

            match self.execute(node, &mut state).await.at_node(node)? {
                Transition::Next(next) => node = next,
                Transition::Finish(outcome) => {
                    info!(
                        domain = %self.profile.domain,
                        outcome = outcome.as_str(),
                        steps = budget.used(),
                        original_question = %state.original_question,
                        final_question = %state.question,
                        "Pipeline finished"
                    );
                    let generation = match outcome.fixed_message() {
                        Some(message) => message.to_string(),
                        None => state.generation,
                    };
                    return Ok(PipelineRun {
                        generation,
                        outcome,
                        final_question: state.question,
                    });
                }
            }
        }
    }

    async fn execute(
        &self,
        node: NodeKind,
        state: &mut WorkingState,
    ) -> Result<Transition, DomainError> {
        info!(
            node = %node,
            domain = %self.profile.domain,
            question = %state.question,
            "Node started"
        );

        let transition = match node {
            NodeKind::ExtractDepartment => self.extract_department(state).await?,
            NodeKind::NotSupportedDepartment => {
                Transition::Finish(RunOutcome::DepartmentNotSupported)
            }
            NodeKind::Retrieve => self.retrieve(state).await?,
            NodeKind::GradeDocuments => self.grade_documents(state).await?,
            NodeKind::Generate => self.generate(state).await?,
            NodeKind::GradeGeneration => self.grade_generation(state).await?,
            NodeKind::TransformQuery => self.transform_query(state).await?,
            NodeKind::QueryFilter | NodeKind::RouteQuery => {
                return Err(DomainError::internal(format!(
                    "router node '{}' dispatched inside a domain pipeline",
                    node
                )));
            }
        };

        info!(node = %node, next = ?transition, "Node finished");
        Ok(transition)
    }

    async fn extract_department(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        let extraction = self
            .extractor
            .extract(&state.question, self.profile.extractor)
            .await?;

        state.department = extraction.scope;
        state.department_result = extraction.check;

        info!(
            department = %state.department,
            department_result = state.department_result.map(|c| c.as_str()),
            "Department extracted"
        );

        if self.profile.has_unsupported_branch()
            && state.department_result == Some(DepartmentCheck::NotSupported)
        {
            Ok(Transition::Next(NodeKind::NotSupportedDepartment))
        } else {
            Ok(Transition::Next(NodeKind::Retrieve))
        }
    }

    async fn retrieve(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        let passages = self
            .retriever
            .retrieve(
                &state.question,
                self.profile.domain,
                &state.department,
                self.profile.retrieval,
            )
            .await?;

        state.documents = format_passages(&passages, self.profile.format);
        info!(documents = state.documents.len(), "Documents retrieved");

        Ok(Transition::Next(NodeKind::GradeDocuments))
    }

    async fn grade_documents(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        let retrieved = state.documents.len();
        let documents = std::mem::take(&mut state.documents);

        state.documents = self
            .document_grader
            .filter_documents(&state.question, documents)
            .await?;

        info!(
            retrieved,
            relevant = state.documents.len(),
            "Documents graded"
        );

        if state.documents.is_empty() {
            Ok(Transition::Next(NodeKind::TransformQuery))
        } else {
            Ok(Transition::Next(NodeKind::Generate))
        }
    }

    async fn generate(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        state.generation = self
            .generator
            .generate(&state.question, &state.documents)
            .await?;

        info!(generation = %preview(&state.generation), "Answer generated");
        Ok(Transition::Next(NodeKind::GradeGeneration))
    }

    async fn grade_generation(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        let verdict = self
            .answer_grader
            .grade_generation(&state.question, &state.documents, &state.generation)
            .await?;

        info!(verdict = %verdict, "Generation graded");

        Ok(match verdict {
            GenerationVerdict::Hallucination => Transition::Next(NodeKind::Generate),
            GenerationVerdict::Relevant => Transition::Finish(RunOutcome::Answered),
            GenerationVerdict::NotRelevant => Transition::Next(NodeKind::TransformQuery),
        })
    }

    async fn transform_query(&self, state: &mut WorkingState) -> Result<Transition, DomainError> {
        state.question = self.rewriter.rewrite(&state.question).await?;

        Ok(match self.profile.department_policy {
            DepartmentPolicy::Keep => Transition::Next(NodeKind::Retrieve),
            DepartmentPolicy::Clear => {
                state.clear_department();
                Transition::Next(NodeKind::Retrieve)
            }
            DepartmentPolicy::ReExtract => Transition::Next(NodeKind::ExtractDepartment),
        })
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= GENERATION_PREVIEW_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(GENERATION_PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}
