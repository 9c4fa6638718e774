//! Per-invocation working state

use crate::domain::department::{DepartmentCheck, DepartmentScope};
use crate::domain::routing::QueryDomain;

/// State threaded through a domain pipeline
#[derive(Debug, Clone, Default)]
pub struct WorkingState {
    /// Current question, replaced by the rewriter
    pub question: String,
    /// Question as the user asked it
    pub original_question: String,
    /// Empty until a terminal node or the generator sets it
    pub generation: String,
    /// Passage texts, replaced wholesale by retrieval and by grading
    pub documents: Vec<String>,
    pub department: DepartmentScope,
    /// Present only in pipelines with tri-state extraction
    pub department_result: Option<DepartmentCheck>,
}

impl WorkingState {
    pub fn new(question: impl Into<String>) -> Self {
        let question = question.into();
        Self {
            original_question: question.clone(),
            question,
            ..Default::default()
        }
    }

    /// Forget the extracted department scope
    pub fn clear_department(&mut self) {
        self.department = DepartmentScope::Unscoped;
        self.department_result = None;
    }
}

/// State of the top-level router
#[derive(Debug, Clone, Default)]
pub struct RouterState {
    pub question: String,
    pub generation: String,
    pub inappropriate: bool,
    /// Set once classification has run
    pub domain: Option<QueryDomain>,
}

impl RouterState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::department::Department;

    #[test]
    fn test_new_state_is_empty() {
        let state = WorkingState::new("소프트웨어학과 3학년 커리큘럼 알려줘");
        assert_eq!(state.question, state.original_question);
        assert!(state.generation.is_empty());
        assert!(state.documents.is_empty());
        assert!(state.department.is_unscoped());
        assert!(state.department_result.is_none());
    }

    #[test]
    fn test_clear_department() {
        let mut state = WorkingState::new("q");
        state.department = DepartmentScope::Single(Department::Software);
        state.department_result = Some(DepartmentCheck::Valid);

        state.clear_department();
        assert!(state.department.is_unscoped());
        assert!(state.department_result.is_none());
    }
}
