//! Step budget bounding every assistant invocation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// A node of the router or a domain pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    QueryFilter,
    RouteQuery,
    ExtractDepartment,
    NotSupportedDepartment,
    Retrieve,
    GradeDocuments,
    Generate,
    GradeGeneration,
    TransformQuery,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueryFilter => "query_filter",
            Self::RouteQuery => "route_query",
            Self::ExtractDepartment => "extract_department",
            Self::NotSupportedDepartment => "not_supported_department",
            Self::Retrieve => "retrieve",
            Self::GradeDocuments => "grade_documents",
            Self::Generate => "generate",
            Self::GradeGeneration => "grade_generation",
            Self::TransformQuery => "transform_query",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts node executions against a hard ceiling.
///
/// `charge` must be called before a node runs; once `limit` nodes have run,
/// the next charge fails with [`PipelineError::BudgetExceeded`].
#[derive(Debug, Clone)]
pub struct StepBudget {
    limit: usize,
    used: usize,
    trail: Vec<NodeKind>,
}

impl StepBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: 0,
            trail: Vec::with_capacity(limit),
        }
    }

    pub fn charge(&mut self, node: NodeKind) -> Result<(), PipelineError> {
        if self.used >= self.limit {
            tracing::warn!(
                limit = self.limit,
                next_node = %node,
                "Step budget exhausted"
            );
            return Err(PipelineError::BudgetExceeded { limit: self.limit });
        }

        self.used += 1;
        self.trail.push(node);
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used
    }

    /// Nodes executed so far, in order
    pub fn trail(&self) -> &[NodeKind] {
        &self.trail
    }
}
