//! Corpus administration bodies

use serde::{Deserialize, Serialize};

use crate::domain::routing::QueryDomain;
use crate::domain::vector_index::{
    NewPassage, DEPARTMENT_KEY, DOMAIN_KEY, IMAGE_URL_KEY, KIND_KEY,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PassageInput {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Passage kind, e.g. "text" or "table"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PassageInput {
    /// Stored passage tagged with the target domain
    pub fn into_passage(self, domain: QueryDomain) -> NewPassage {
        let mut passage = NewPassage::new(self.content).with_metadata(DOMAIN_KEY, domain.as_str());

        if let Some(id) = self.id {
            passage = passage.with_id(id);
        }
        if let Some(department) = self.department {
            passage = passage.with_metadata(DEPARTMENT_KEY, department);
        }
        if let Some(kind) = self.kind {
            passage = passage.with_metadata(KIND_KEY, kind);
        }
        if let Some(url) = self.image_url {
            passage = passage.with_metadata(IMAGE_URL_KEY, url);
        }

        passage
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub passages: Vec<PassageInput>,
    /// Remove the domain's existing passages first
    #[serde(default)]
    pub replace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub domain: QueryDomain,
    pub ids: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub domain: QueryDomain,
    /// Unknown for backends that do not report counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_passage_tags_domain_and_metadata() {
        let input: PassageInput = serde_json::from_value(serde_json::json!({
            "content": "| 학년 | 과목 |",
            "department": "소프트웨어학과",
            "type": "table",
            "image_url": "https://example.org/t.png"
        }))
        .unwrap();

        let passage = input.into_passage(QueryDomain::Curriculum);
        assert_eq!(passage.metadata_str(DOMAIN_KEY), Some("curriculum"));
        assert_eq!(passage.metadata_str(DEPARTMENT_KEY), Some("소프트웨어학과"));
        assert_eq!(passage.metadata_str(KIND_KEY), Some("table"));
        assert!(passage.id.is_none());
    }
}
