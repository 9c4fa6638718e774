//! Grading outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

/// A yes/no verdict from a grading call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryGrade {
    Yes,
    No,
}

impl BinaryGrade {
    /// Interpret a model's `binary_score`; anything other than "yes" is `No`
    pub fn from_score(score: &str) -> Self {
        if score.trim().eq_ignore_ascii_case("yes") {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Outcome of grading a generation against passages and question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationVerdict {
    /// Not supported by the passages; regenerate from the same passages
    Hallucination,
    /// Grounded and answers the question; accept
    Relevant,
    /// Grounded but does not answer the question; rewrite and retrieve again
    NotRelevant,
}

impl GenerationVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hallucination => "hallucination",
            Self::Relevant => "relevant",
            Self::NotRelevant => "not relevant",
        }
    }
}

impl fmt::Display for GenerationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
