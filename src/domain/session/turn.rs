//! Thread identifiers and recorded turns

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::pipeline::RunOutcome;
use crate::domain::routing::QueryDomain;

/// Conversation thread identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random thread
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One completed question and answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<QueryDomain>,
    pub outcome: RunOutcome,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        domain: Option<QueryDomain>,
        outcome: RunOutcome,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            domain,
            outcome,
            at: Utc::now(),
        }
    }
}
