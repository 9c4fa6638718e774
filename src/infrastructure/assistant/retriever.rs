//! Domain and department scoped retrieval

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::department::{Department, DepartmentScope};
use crate::domain::pipeline::RetrievalBudget;
use crate::domain::routing::QueryDomain;
use crate::domain::vector_index::{
    FilterCondition, MetadataFilter, Passage, SearchParams, VectorIndex, DEPARTMENT_KEY,
    DOMAIN_KEY,
};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Search the domain partition, scoped by department when one is known.
    ///
    /// Several departments get one search each at the per-department budget;
    /// results are concatenated in department order without re-ranking.
    pub async fn retrieve(
        &self,
        question: &str,
        domain: QueryDomain,
        scope: &DepartmentScope,
        budget: RetrievalBudget,
    ) -> Result<Vec<Passage>, DomainError> {
        let passages = match scope {
            DepartmentScope::Unscoped => {
                self.search(question, domain_filter(domain), budget.k).await?
            }
            DepartmentScope::Single(dept) => {
                self.search(question, department_filter(domain, *dept), budget.k)
                    .await?
            }
            DepartmentScope::Multiple(depts) => {
                let mut passages = Vec::with_capacity(depts.len() * budget.per_department_k);
                for dept in depts {
                    let found = self
                        .search(
                            question,
                            department_filter(domain, *dept),
                            budget.per_department_k,
                        )
                        .await?;
                    debug!(department = %dept, results = found.len(), "Department search finished");
                    passages.extend(found);
                }
                passages
            }
        };

        info!(
            domain = %domain,
            scope = %scope,
            results = passages.len(),
            "Retrieval finished"
        );
        Ok(passages)
    }

    async fn search(
        &self,
        question: &str,
        filter: MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<Passage>, DomainError> {
        let params = SearchParams::new(question)
            .with_top_k(top_k)
            .with_filter(filter);
        self.index.search(params).await
    }
}

fn domain_filter(domain: QueryDomain) -> MetadataFilter {
    MetadataFilter::condition(FilterCondition::eq(DOMAIN_KEY, domain.as_str()))
}

fn department_filter(domain: QueryDomain, dept: Department) -> MetadataFilter {
    MetadataFilter::and(vec![
        domain_filter(domain),
        MetadataFilter::condition(FilterCondition::eq(DEPARTMENT_KEY, dept.name())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::vector_index::NewPassage;
    use crate::infrastructure::vector_index::{Embedder, InMemoryVectorIndex};

    fn passage(domain: &str, department: &str, content: &str) -> NewPassage {
        NewPassage::new(content)
            .with_metadata(DOMAIN_KEY, domain)
            .with_metadata(DEPARTMENT_KEY, department)
    }

    async fn seeded_index() -> Arc<InMemoryVectorIndex> {
        let embedder = Embedder::new(Arc::new(MockEmbeddingProvider::new(8)), "mock", 8);
        let index = Arc::new(InMemoryVectorIndex::new(embedder));

        index
            .add_passages(vec![
                passage("employment_status", "소프트웨어학과", "SW 취업률 1"),
                passage("employment_status", "소프트웨어학과", "SW 취업률 2"),
                passage("employment_status", "소프트웨어학과", "SW 취업률 3"),
                passage("employment_status", "사이버보안학과", "보안 취업률 1"),
                passage("employment_status", "사이버보안학과", "보안 취업률 2"),
                passage("employment_status", "사이버보안학과", "보안 취업률 3"),
                passage("curriculum", "소프트웨어학과", "SW 커리큘럼"),
            ])
            .await
            .unwrap();

        index
    }

    #[tokio::test]
    async fn test_unscoped_stays_in_domain() {
        let retriever = Retriever::new(seeded_index().await);

        let passages = retriever
            .retrieve(
                "취업률",
                QueryDomain::EmploymentStatus,
                &DepartmentScope::Unscoped,
                RetrievalBudget::new(10, 2),
            )
            .await
            .unwrap();

        assert_eq!(passages.len(), 6);
        assert!(passages.iter().all(|p| p.domain() == Some("employment_status")));
    }

    #[tokio::test]
    async fn test_single_department_requires_domain_and_department() {
        let retriever = Retriever::new(seeded_index().await);

        let passages = retriever
            .retrieve(
                "커리큘럼",
                QueryDomain::Curriculum,
                &DepartmentScope::Single(Department::Software),
                RetrievalBudget::new(5, 5),
            )
            .await
            .unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].content, "SW 커리큘럼");
    }

    #[tokio::test]
    async fn test_multiple_departments_concatenate_in_order() {
        let retriever = Retriever::new(seeded_index().await);

        let passages = retriever
            .retrieve(
                "취업률",
                QueryDomain::EmploymentStatus,
                &DepartmentScope::Multiple(vec![Department::CyberSecurity, Department::Software]),
                RetrievalBudget::new(5, 2),
            )
            .await
            .unwrap();

        assert_eq!(passages.len(), 4);
        assert!(passages[..2].iter().all(|p| p.department() == Some("사이버보안학과")));
        assert!(passages[2..].iter().all(|p| p.department() == Some("소프트웨어학과")));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let retriever = Retriever::new(seeded_index().await);

        let passages = retriever
            .retrieve(
                "과목",
                QueryDomain::Course,
                &DepartmentScope::Unscoped,
                RetrievalBudget::new(5, 5),
            )
            .await
            .unwrap();

        assert!(passages.is_empty());
    }
}
