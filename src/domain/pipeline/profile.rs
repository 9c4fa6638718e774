//! Per-domain pipeline variation

use serde::{Deserialize, Serialize};

use crate::domain::routing::QueryDomain;

/// Which department extractor a pipeline uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorVariant {
    /// One department or none; no unsupported branch
    Single,
    /// valid / not_supported / not_specific, with a terminal unsupported branch
    TriState,
}

/// How retrieved passages are rendered into documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageFormat {
    /// Passage text only
    Plain,
    /// XML-like markup carrying department and table image metadata
    Tagged,
}

/// What happens to the extracted department when the question is rewritten
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentPolicy {
    /// Reuse the scope extracted from the original question
    #[default]
    Keep,
    /// Retrieve unscoped after a rewrite
    Clear,
    /// Run extraction again on the rewritten question
    ReExtract,
}

/// Result-count budget for a retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalBudget {
    /// Results for unscoped and single-department searches
    pub k: usize,
    /// Results per department when several are searched
    pub per_department_k: usize,
}

impl RetrievalBudget {
    pub fn new(k: usize, per_department_k: usize) -> Self {
        Self { k, per_department_k }
    }
}

/// Everything that varies between domain pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineProfile {
    pub domain: QueryDomain,
    pub extractor: ExtractorVariant,
    pub retrieval: RetrievalBudget,
    pub format: PassageFormat,
    pub department_policy: DepartmentPolicy,
}

impl PipelineProfile {
    /// Default profile for a domain, or `None` for `Other`
    pub fn for_domain(domain: QueryDomain) -> Option<Self> {
        let (extractor, retrieval, format) = match domain {
            QueryDomain::Course | QueryDomain::Curriculum => (
                ExtractorVariant::Single,
                RetrievalBudget::new(5, 5),
                PassageFormat::Plain,
            ),
            QueryDomain::DepartmentIntro => (
                ExtractorVariant::TriState,
                RetrievalBudget::new(2, 2),
                PassageFormat::Plain,
            ),
            QueryDomain::EmploymentStatus => (
                ExtractorVariant::TriState,
                RetrievalBudget::new(2, 2),
                PassageFormat::Tagged,
            ),
            QueryDomain::Other => return None,
        };

        Some(Self {
            domain,
            extractor,
            retrieval,
            format,
            department_policy: DepartmentPolicy::Keep,
        })
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalBudget) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn with_department_policy(mut self, policy: DepartmentPolicy) -> Self {
        self.department_policy = policy;
        self
    }

    pub fn has_unsupported_branch(&self) -> bool {
        matches!(self.extractor, ExtractorVariant::TriState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles() {
        let course = PipelineProfile::for_domain(QueryDomain::Course).unwrap();
        assert_eq!(course.extractor, ExtractorVariant::Single);
        assert_eq!(course.retrieval.k, 5);
        assert!(!course.has_unsupported_branch());

        let employment = PipelineProfile::for_domain(QueryDomain::EmploymentStatus).unwrap();
        assert_eq!(employment.format, PassageFormat::Tagged);
        assert_eq!(employment.retrieval.per_department_k, 2);
        assert!(employment.has_unsupported_branch());

        assert!(PipelineProfile::for_domain(QueryDomain::Other).is_none());
    }

    #[test]
    fn test_policy_deserialization() {
        let policy: DepartmentPolicy = serde_json::from_str("\"re_extract\"").unwrap();
        assert_eq!(policy, DepartmentPolicy::ReExtract);
        assert_eq!(DepartmentPolicy::default(), DepartmentPolicy::Keep);
    }
}
