//! Assistant entry point: router, domain dispatch, step budget and session history

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use super::extractor::DepartmentExtractor;
use super::generator::AnswerGenerator;
use super::pipeline::DomainPipeline;
use super::prompts::DomainPrompts;
use super::retriever::Retriever;
use super::rewriter::QueryRewriter;
use super::router::QueryRouter;
use crate::config::PipelineConfig;
use crate::domain::pipeline::{
    NodeKind, NodeResultExt, PipelineError, PipelineProfile, RouterState, RunOutcome, StepBudget,
};
use crate::domain::routing::QueryDomain;
use crate::domain::session::{SessionStore, ThreadId, Turn};
use crate::domain::vector_index::VectorIndex;
use crate::domain::DomainError;
use crate::infrastructure::crag::{LlmAnswerGrader, LlmDocumentGrader};
use crate::infrastructure::llm::ModelClient;
use crate::infrastructure::observability::{record_node_execution, record_pipeline_outcome};

const ROUTER_LABEL: &str = "router";

/// Answer to one question
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub answer: String,
    pub thread_id: ThreadId,
    /// Unset when the question was filtered before classification
    pub domain: Option<QueryDomain>,
    pub outcome: RunOutcome,
    /// Node executions charged against the budget
    pub steps: usize,
}

#[derive(Debug)]
pub struct Assistant {
    router: QueryRouter,
    pipelines: HashMap<QueryDomain, DomainPipeline>,
    sessions: Arc<dyn SessionStore>,
    step_budget: usize,
}

impl Assistant {
    pub fn new(
        router: QueryRouter,
        pipelines: Vec<DomainPipeline>,
        sessions: Arc<dyn SessionStore>,
        step_budget: usize,
    ) -> Self {
        let pipelines = pipelines
            .into_iter()
            .map(|pipeline| (pipeline.domain(), pipeline))
            .collect();

        Self {
            router,
            pipelines,
            sessions,
            step_budget,
        }
    }

    /// Build the router and one pipeline per answerable domain, sharing one model client
    pub fn from_config(
        client: ModelClient,
        index: Arc<dyn VectorIndex>,
        sessions: Arc<dyn SessionStore>,
        config: &PipelineConfig,
    ) -> Self {
        let retriever = Retriever::new(index);

        let pipelines = QueryDomain::ALL
            .into_iter()
            .filter_map(|domain| {
                let profile = PipelineProfile::for_domain(domain)?
                    .with_retrieval(config.retrieval_for(domain)?)
                    .with_department_policy(config.department_policy);
                Some(build_pipeline(
                    profile,
                    &client,
                    &retriever,
                    config.grading_concurrency,
                ))
            })
            .collect();

        Self::new(QueryRouter::new(client), pipelines, sessions, config.step_budget)
    }

    /// Pipeline for a domain; `Other` has none
    pub fn dispatch(&self, domain: QueryDomain) -> Option<&DomainPipeline> {
        self.pipelines.get(&domain)
    }

    /// Node executions allowed per invocation
    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    /// Answer a question within the step budget and record the turn.
    ///
    /// Every run ends in a reply. Budget exhaustion and node failures are
    /// logged and answered with their fixed message.
    pub async fn run_pipeline(&self, question: &str, thread: &ThreadId) -> AssistantReply {
        let started = Instant::now();
        let mut budget = StepBudget::new(self.step_budget);
        let mut state = RouterState::new(question);

        info!(thread_id = %thread, question = %question, "Assistant invoked");

        let outcome = match self.route_and_run(&mut state, &mut budget).await {
            Ok(outcome) => outcome,
            Err(PipelineError::BudgetExceeded { limit }) => {
                warn!(
                    thread_id = %thread,
                    limit,
                    trail = ?budget.trail(),
                    "Step budget exceeded, returning fallback answer"
                );
                RunOutcome::BudgetExceeded
            }
            Err(PipelineError::Node { node, source }) => {
                error!(
                    thread_id = %thread,
                    node = node.as_str(),
                    error = %source,
                    trail = ?budget.trail(),
                    "Assistant node failed, returning apology"
                );
                RunOutcome::Failed
            }
        };

        let answer = match outcome.fixed_message() {
            Some(message) => message.to_string(),
            None => state.generation,
        };

        let domain_label = state.domain.map_or(ROUTER_LABEL, |d| d.as_str());
        record_pipeline_outcome(domain_label, outcome.as_str(), budget.used(), started.elapsed());

        let turn = Turn::new(question, answer.clone(), state.domain, outcome);
        if let Err(e) = self.sessions.append(thread, turn).await {
            warn!(thread_id = %thread, error = %e, "Failed to record turn");
        }

        info!(
            thread_id = %thread,
            domain = domain_label,
            outcome = outcome.as_str(),
            steps = budget.used(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assistant answered"
        );

        AssistantReply {
            answer,
            thread_id: thread.clone(),
            domain: state.domain,
            outcome,
            steps: budget.used(),
        }
    }

    /// Recorded turns of a thread, oldest first
    pub async fn history(&self, thread: &ThreadId) -> Result<Vec<Turn>, DomainError> {
        self.sessions.history(thread).await
    }

    async fn route_and_run(
        &self,
        state: &mut RouterState,
        budget: &mut StepBudget,
    ) -> Result<RunOutcome, PipelineError> {
        budget.charge(NodeKind::QueryFilter)?;
        record_node_execution(ROUTER_LABEL, NodeKind::QueryFilter.as_str());

        state.inappropriate = self
            .router
            .filter_inappropriate(&state.question)
            .await
            .at_node(NodeKind::QueryFilter)?;

        if state.inappropriate {
            return Ok(RunOutcome::Inappropriate);
        }

        budget.charge(NodeKind::RouteQuery)?;
        record_node_execution(ROUTER_LABEL, NodeKind::RouteQuery.as_str());

        let domain = self
            .router
            .classify_domain(&state.question)
            .await
            .at_node(NodeKind::RouteQuery)?;
        state.domain = Some(domain);

        let Some(pipeline) = self.dispatch(domain) else {
            return Ok(RunOutcome::OutOfScope);
        };

        let run = pipeline.run(&state.question, budget).await?;
        state.generation = run.generation;
        Ok(run.outcome)
    }
}

fn build_pipeline(
    profile: PipelineProfile,
    client: &ModelClient,
    retriever: &Retriever,
    grading_concurrency: usize,
) -> DomainPipeline {
    let prompts = DomainPrompts::for_domain(profile.domain);

    let document_grader = LlmDocumentGrader::new(client.clone(), prompts.grade_document)
        .with_concurrency(grading_concurrency);
    let answer_grader = LlmAnswerGrader::new(
        client.clone(),
        prompts.groundedness,
        prompts.resolution,
        prompts.document_separator,
    );

    DomainPipeline::new(
        profile,
        DepartmentExtractor::new(client.clone()),
        retriever.clone(),
        Arc::new(document_grader),
        AnswerGenerator::new(client.clone(), prompts.generate, prompts.document_separator),
        Arc::new(answer_grader),
        QueryRewriter::new(client.clone()),
    )
}
