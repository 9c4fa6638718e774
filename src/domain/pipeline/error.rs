//! Pipeline error types

use thiserror::Error;

use super::budget::NodeKind;
use crate::domain::DomainError;

/// Errors that abort an assistant invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Step budget of {limit} node executions exceeded")]
    BudgetExceeded { limit: usize },

    #[error("Node '{node}' failed: {source}")]
    Node {
        node: NodeKind,
        #[source]
        source: DomainError,
    },
}

impl PipelineError {
    pub fn node(node: NodeKind, source: DomainError) -> Self {
        Self::Node { node, source }
    }

    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Self::BudgetExceeded { .. })
    }
}

/// Attach the failing node to a domain error
pub trait NodeResultExt<T> {
    fn at_node(self, node: NodeKind) -> Result<T, PipelineError>;
}

impl<T> NodeResultExt<T> for Result<T, DomainError> {
    fn at_node(self, node: NodeKind) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::node(node, e))
    }
}
