//! Department extraction
//!
//! Model output naming departments is untrusted: every name is resolved
//! against the catalog before it can scope a retrieval.

use serde::Deserialize;
use tracing::{info, warn};

use super::prompts::{department_catalog, CLASSIFY_DEPARTMENT, EXTRACT_DEPARTMENT};
use crate::domain::department::{Department, DepartmentCheck, DepartmentMention, DepartmentScope};
use crate::domain::llm::{object_schema, StructuredOutput};
use crate::domain::pipeline::ExtractorVariant;
use crate::domain::DomainError;
use crate::infrastructure::llm::ModelClient;

/// Single-department reply; an empty string means no department
#[derive(Debug, Deserialize)]
pub struct DepartmentExtracted {
    pub department: String,
}

impl StructuredOutput for DepartmentExtracted {
    const NAME: &'static str = "extract_department";

    fn json_schema() -> serde_json::Value {
        object_schema(serde_json::json!({
            "department": {
                "type": "string",
                "description": "Department name from the list, or an empty string"
            }
        }))
    }
}

/// Tri-state reply
#[derive(Debug, Deserialize)]
pub struct DepartmentClassified {
    pub result: DepartmentCheck,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl StructuredOutput for DepartmentClassified {
    const NAME: &'static str = "classify_department";

    fn json_schema() -> serde_json::Value {
        object_schema(serde_json::json!({
            "result": {
                "type": "string",
                "enum": ["valid", "not_supported", "not_specific"]
            },
            "departments": {
                "type": "array",
                "items": { "type": "string" }
            }
        }))
    }
}

/// Validated extraction result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub scope: DepartmentScope,
    /// Set by the tri-state variant only
    pub check: Option<DepartmentCheck>,
}

impl Extraction {
    fn single(scope: DepartmentScope) -> Self {
        Self { scope, check: None }
    }

    fn checked(check: DepartmentCheck, departments: Vec<Department>) -> Self {
        Self {
            scope: DepartmentScope::from_departments(departments),
            check: Some(check),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepartmentExtractor {
    client: ModelClient,
}

impl DepartmentExtractor {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Department scope of a question, using the variant configured for the domain
    pub async fn extract(
        &self,
        question: &str,
        variant: ExtractorVariant,
    ) -> Result<Extraction, DomainError> {
        let catalog = department_catalog();

        match variant {
            ExtractorVariant::Single => {
                let messages = EXTRACT_DEPARTMENT
                    .render(&[("departments", &catalog), ("question", question)])?;
                let reply: DepartmentExtracted = self.client.invoke_structured(messages).await?;
                Ok(resolve_single(&reply.department))
            }
            ExtractorVariant::TriState => {
                let messages = CLASSIFY_DEPARTMENT
                    .render(&[("departments", &catalog), ("question", question)])?;
                let reply: DepartmentClassified = self.client.invoke_structured(messages).await?;
                Ok(resolve_tri_state(reply))
            }
        }
    }
}

fn resolve_single(raw: &str) -> Extraction {
    match DepartmentMention::parse(raw) {
        DepartmentMention::Known(dept) => Extraction::single(DepartmentScope::Single(dept)),
        DepartmentMention::Unrecognized(name) => {
            warn!(department = %name, "Extracted department is not in the catalog, searching unscoped");
            Extraction::single(DepartmentScope::Unscoped)
        }
        DepartmentMention::None => Extraction::single(DepartmentScope::Unscoped),
    }
}

fn resolve_tri_state(reply: DepartmentClassified) -> Extraction {
    let mentions: Vec<DepartmentMention> = reply
        .departments
        .iter()
        .map(|name| DepartmentMention::parse(name))
        .filter(|m| *m != DepartmentMention::None)
        .collect();

    let known: Vec<Department> = mentions.iter().filter_map(DepartmentMention::known).collect();
    let unrecognized: Vec<&str> = mentions
        .iter()
        .filter_map(|m| match m {
            DepartmentMention::Unrecognized(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let extraction = match reply.result {
        DepartmentCheck::Valid if !known.is_empty() => {
            if !unrecognized.is_empty() {
                warn!(dropped = ?unrecognized, "Ignoring departments outside the catalog");
            }
            Extraction::checked(DepartmentCheck::Valid, known)
        }
        DepartmentCheck::Valid if !unrecognized.is_empty() => {
            warn!(departments = ?unrecognized, "Classifier marked unknown departments as valid");
            Extraction::checked(DepartmentCheck::NotSupported, Vec::new())
        }
        DepartmentCheck::Valid => Extraction::checked(DepartmentCheck::NotSpecific, Vec::new()),
        DepartmentCheck::NotSupported if !known.is_empty() && unrecognized.is_empty() => {
            warn!(departments = ?known, "Classifier marked catalog departments as not supported");
            Extraction::checked(DepartmentCheck::Valid, known)
        }
        DepartmentCheck::NotSupported => {
            Extraction::checked(DepartmentCheck::NotSupported, Vec::new())
        }
        DepartmentCheck::NotSpecific => {
            Extraction::checked(DepartmentCheck::NotSpecific, Vec::new())
        }
    };

    info!(
        result = ?extraction.check,
        scope = %extraction.scope,
        "Department classified"
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::infrastructure::llm::ModelSettings;
    use std::sync::Arc;

    fn extractor(provider: MockLlmProvider) -> DepartmentExtractor {
        DepartmentExtractor::new(ModelClient::new(
            Arc::new(provider),
            ModelSettings::default().with_max_retries(0),
        ))
    }

    fn classified(result: DepartmentCheck, departments: &[&str]) -> DepartmentClassified {
        DepartmentClassified {
            result,
            departments: departments.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_single_known_department() {
        let provider = MockLlmProvider::new("mock")
            .on("extract_department", r#"{"department": "소프트웨어학과"}"#);

        let extraction = extractor(provider)
            .extract("소프트웨어학과 3학년 커리큘럼 알려줘", ExtractorVariant::Single)
            .await
            .unwrap();

        assert_eq!(extraction.scope, DepartmentScope::Single(Department::Software));
        assert!(extraction.check.is_none());
    }

    #[tokio::test]
    async fn test_single_empty_and_unknown_are_unscoped() {
        let provider = MockLlmProvider::new("mock")
            .on("extract_department", r#"{"department": ""}"#)
            .on("extract_department", r#"{"department": "기계공학과"}"#);
        let extractor = extractor(provider);

        for _ in 0..2 {
            let extraction = extractor.extract("q", ExtractorVariant::Single).await.unwrap();
            assert!(extraction.scope.is_unscoped());
        }
    }

    #[tokio::test]
    async fn test_tri_state_multiple_departments() {
        let provider = MockLlmProvider::new("mock").on(
            "classify_department",
            r#"{"result": "valid", "departments": ["소프트웨어학과", "사이버보안학과"]}"#,
        );

        let extraction = extractor(provider)
            .extract("소프트웨어학과와 사이버보안학과 취업률 비교", ExtractorVariant::TriState)
            .await
            .unwrap();

        assert_eq!(extraction.check, Some(DepartmentCheck::Valid));
        assert_eq!(
            extraction.scope,
            DepartmentScope::Multiple(vec![Department::Software, Department::CyberSecurity])
        );
    }

    #[tokio::test]
    async fn test_parse_failure_is_an_error() {
        let provider = MockLlmProvider::new("mock").on("classify_department", "valid");

        let err = extractor(provider)
            .extract("q", ExtractorVariant::TriState)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StructuredOutput { .. }));
    }

    #[test]
    fn test_valid_drops_unknown_names() {
        let extraction = resolve_tri_state(classified(
            DepartmentCheck::Valid,
            &["디지털미디어", "기계공학과"],
        ));
        assert_eq!(extraction.check, Some(DepartmentCheck::Valid));
        assert_eq!(extraction.scope, DepartmentScope::Single(Department::DigitalMedia));
    }

    #[test]
    fn test_valid_with_only_unknown_names_is_not_supported() {
        let extraction = resolve_tri_state(classified(DepartmentCheck::Valid, &["기계공학과"]));
        assert_eq!(extraction.check, Some(DepartmentCheck::NotSupported));
        assert!(extraction.scope.is_unscoped());
    }

    #[test]
    fn test_valid_without_names_is_not_specific() {
        let extraction = resolve_tri_state(classified(DepartmentCheck::Valid, &[" "]));
        assert_eq!(extraction.check, Some(DepartmentCheck::NotSpecific));
    }

    #[test]
    fn test_not_supported_catalog_department_is_corrected() {
        let extraction =
            resolve_tri_state(classified(DepartmentCheck::NotSupported, &["인공지능융합학과"]));
        assert_eq!(extraction.check, Some(DepartmentCheck::Valid));
        assert_eq!(extraction.scope, DepartmentScope::Single(Department::AiConvergence));
    }

    #[test]
    fn test_not_supported_unknown_department() {
        let extraction = resolve_tri_state(classified(
            DepartmentCheck::NotSupported,
            &["기계공학과", "소프트웨어학과"],
        ));
        assert_eq!(extraction.check, Some(DepartmentCheck::NotSupported));
        assert!(extraction.scope.is_unscoped());
    }

    #[test]
    fn test_not_specific_ignores_names() {
        let extraction =
            resolve_tri_state(classified(DepartmentCheck::NotSpecific, &["소프트웨어학과"]));
        assert_eq!(extraction.check, Some(DepartmentCheck::NotSpecific));
        assert!(extraction.scope.is_unscoped());
    }
}
