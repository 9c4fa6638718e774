//! Passages stored in and returned from the vector index

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata key carrying the domain label
pub const DOMAIN_KEY: &str = "domain";
/// Metadata key carrying the department name
pub const DEPARTMENT_KEY: &str = "department";
/// Metadata key carrying the passage kind (text or table)
pub const KIND_KEY: &str = "type";
/// Metadata key carrying the image URL of a table passage
pub const IMAGE_URL_KEY: &str = "image_url";
/// Metadata key carrying the id of the ingest request that stored the passage
pub const BATCH_KEY: &str = "ingest_batch";

/// A retrieved passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub content: String,
    /// Similarity score (higher is closer)
    pub score: f32,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Passage {
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn domain(&self) -> Option<&str> {
        self.metadata_str(DOMAIN_KEY)
    }

    pub fn department(&self) -> Option<&str> {
        self.metadata_str(DEPARTMENT_KEY)
    }

    pub fn kind(&self) -> Option<&str> {
        self.metadata_str(KIND_KEY)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.metadata_str(IMAGE_URL_KEY)
    }

    pub fn is_table(&self) -> bool {
        self.kind() == Some("table")
    }
}

/// A passage to be written to the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPassage {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl NewPassage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
