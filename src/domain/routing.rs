//! Topical domains used for routing and index partitioning

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// The domain a question is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDomain {
    Course,
    Curriculum,
    DepartmentIntro,
    EmploymentStatus,
    Other,
}

impl QueryDomain {
    pub const ALL: [QueryDomain; 5] = [
        Self::Course,
        Self::Curriculum,
        Self::DepartmentIntro,
        Self::EmploymentStatus,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Curriculum => "curriculum",
            Self::DepartmentIntro => "department_intro",
            Self::EmploymentStatus => "employment_status",
            Self::Other => "other",
        }
    }

    /// Parse a classifier label; unknown labels are treated as `Other`
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Other)
    }

    /// Whether the domain has a pipeline and indexed passages
    pub fn is_answerable(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl FromStr for QueryDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown domain: {}", s)))
    }
}

impl fmt::Display for QueryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
