//! How an invocation ended, and the fixed user-facing messages

use serde::{Deserialize, Serialize};

/// Refusal for inappropriate questions
pub const INAPPROPRIATE_MESSAGE: &str =
    "죄송합니다. 해당 질문은 서비스 정책에 따라 답변드릴 수 없습니다. 다른 질문을 해주세요.";

/// Reply for questions outside every domain
pub const OUT_OF_SCOPE_MESSAGE: &str =
    "해당 질문은 현재 제공 중인 학사 정보 범위에 포함되지 않습니다. 다른 질문을 해보세요.";

/// Reply for departments outside the catalog
pub const DEPARTMENT_NOT_FOUND_MESSAGE: &str =
    "죄송합니다. 현재 아주대학교에는 해당 학과가 존재하지 않아 안내드릴 수 없습니다.";

/// Reply when the step budget runs out
pub const BUDGET_EXCEEDED_MESSAGE: &str =
    "관련된 정보를 찾을 수 없습니다. 다른 질문을 시도해보세요.";

/// Reply when a node fails, e.g. the model or the vector index is unavailable
pub const FAILED_MESSAGE: &str =
    "죄송합니다. 답변을 준비하는 중 문제가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Terminal outcome of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// A generation passed both grading checks
    Answered,
    Inappropriate,
    OutOfScope,
    DepartmentNotSupported,
    BudgetExceeded,
    /// A node failed; the cause is logged, never shown to the user
    Failed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Inappropriate => "inappropriate",
            Self::OutOfScope => "out_of_scope",
            Self::DepartmentNotSupported => "department_not_supported",
            Self::BudgetExceeded => "budget_exceeded",
            Self::Failed => "failed",
        }
    }

    /// Fixed reply for outcomes that short-circuit generation
    pub fn fixed_message(&self) -> Option<&'static str> {
        match self {
            Self::Answered => None,
            Self::Inappropriate => Some(INAPPROPRIATE_MESSAGE),
            Self::OutOfScope => Some(OUT_OF_SCOPE_MESSAGE),
            Self::DepartmentNotSupported => Some(DEPARTMENT_NOT_FOUND_MESSAGE),
            Self::BudgetExceeded => Some(BUDGET_EXCEEDED_MESSAGE),
            Self::Failed => Some(FAILED_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_answered_has_no_fixed_message() {
        let outcomes = [
            RunOutcome::Answered,
            RunOutcome::Inappropriate,
            RunOutcome::OutOfScope,
            RunOutcome::DepartmentNotSupported,
            RunOutcome::BudgetExceeded,
            RunOutcome::Failed,
        ];

        for outcome in outcomes {
            assert_eq!(outcome.fixed_message().is_none(), outcome == RunOutcome::Answered);
        }
        assert_eq!(RunOutcome::Failed.fixed_message(), Some(FAILED_MESSAGE));
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(serde_json::to_value(RunOutcome::Failed).unwrap(), "failed");
        assert_eq!(
            serde_json::to_value(RunOutcome::DepartmentNotSupported).unwrap(),
            RunOutcome::DepartmentNotSupported.as_str()
        );
    }
}
