//! Academic departments recognized by the assistant

use std::fmt;

use serde::{Deserialize, Serialize};

/// A department from the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Software,
    DigitalMedia,
    DefenseDigitalConvergence,
    AiConvergence,
    CyberSecurity,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Self::Software,
        Self::DigitalMedia,
        Self::DefenseDigitalConvergence,
        Self::AiConvergence,
        Self::CyberSecurity,
    ];

    /// Korean name as stored in passage metadata
    pub fn name(&self) -> &'static str {
        match self {
            Self::Software => "소프트웨어학과",
            Self::DigitalMedia => "디지털미디어학과",
            Self::DefenseDigitalConvergence => "국방디지털융합학과",
            Self::AiConvergence => "인공지능융합학과",
            Self::CyberSecurity => "사이버보안학과",
        }
    }

    /// Resolve a department from model output.
    ///
    /// Whitespace is ignored and the trailing "학과" is optional; anything else
    /// must match a catalog name exactly.
    pub fn from_name(raw: &str) -> Option<Self> {
        let normalized: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if normalized.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|dept| {
            let name = dept.name();
            normalized == name || name.strip_suffix("학과") == Some(normalized.as_str())
        })
    }

    /// Comma separated catalog, used in extraction prompts
    pub fn catalog() -> String {
        Self::ALL
            .iter()
            .map(Department::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A department name as reported by the model, validated against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentMention {
    Known(Department),
    Unrecognized(String),
    None,
}

impl DepartmentMention {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::None;
        }

        match Department::from_name(trimmed) {
            Some(dept) => Self::Known(dept),
            None => Self::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn known(&self) -> Option<Department> {
        match self {
            Self::Known(dept) => Some(*dept),
            _ => None,
        }
    }
}

/// Outcome of the tri-state department classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentCheck {
    /// The question targets catalog departments
    Valid,
    /// The question targets a department outside the catalog
    NotSupported,
    /// The question does not target any department
    NotSpecific,
}

impl DepartmentCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::NotSupported => "not_supported",
            Self::NotSpecific => "not_specific",
        }
    }
}

/// Department scope applied to retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DepartmentScope {
    /// Whole-domain search
    #[default]
    Unscoped,
    Single(Department),
    /// One scoped search per department, in order
    Multiple(Vec<Department>),
}

impl DepartmentScope {
    /// Build a scope from a list, collapsing duplicates and trivial lists
    pub fn from_departments(departments: Vec<Department>) -> Self {
        let mut unique: Vec<Department> = Vec::with_capacity(departments.len());
        for dept in departments {
            if !unique.contains(&dept) {
                unique.push(dept);
            }
        }

        match unique.len() {
            0 => Self::Unscoped,
            1 => Self::Single(unique[0]),
            _ => Self::Multiple(unique),
        }
    }

    pub fn departments(&self) -> Vec<Department> {
        match self {
            Self::Unscoped => Vec::new(),
            Self::Single(dept) => vec![*dept],
            Self::Multiple(depts) => depts.clone(),
        }
    }

    pub fn is_unscoped(&self) -> bool {
        matches!(self, Self::Unscoped)
    }
}

impl fmt::Display for DepartmentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscoped => f.write_str("<none>"),
            Self::Single(dept) => write!(f, "{}", dept),
            Self::Multiple(depts) => {
                let names: Vec<&str> = depts.iter().map(Department::name).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_exact_and_normalized() {
        assert_eq!(Department::from_name("소프트웨어학과"), Some(Department::Software));
        assert_eq!(Department::from_name(" 사이버 보안학과 "), Some(Department::CyberSecurity));
        assert_eq!(Department::from_name("인공지능융합"), Some(Department::AiConvergence));
        assert_eq!(Department::from_name("경영학과"), None);
        assert_eq!(Department::from_name(""), None);
        assert_eq!(Department::from_name("학과"), None);
    }

    #[test]
    fn test_mention_parse() {
        assert_eq!(
            DepartmentMention::parse("디지털미디어학과"),
            DepartmentMention::Known(Department::DigitalMedia)
        );
        assert_eq!(
            DepartmentMention::parse(" 경영학과"),
            DepartmentMention::Unrecognized("경영학과".to_string())
        );
        assert_eq!(DepartmentMention::parse("  "), DepartmentMention::None);
    }

    #[test]
    fn test_catalog_lists_all_departments() {
        let catalog = Department::catalog();
        for dept in Department::ALL {
            assert!(catalog.contains(dept.name()));
        }
    }

    #[test]
    fn test_scope_from_departments() {
        assert_eq!(DepartmentScope::from_departments(vec![]), DepartmentScope::Unscoped);
        assert_eq!(
            DepartmentScope::from_departments(vec![Department::Software, Department::Software]),
            DepartmentScope::Single(Department::Software)
        );
        assert_eq!(
            DepartmentScope::from_departments(vec![Department::Software, Department::CyberSecurity]),
            DepartmentScope::Multiple(vec![Department::Software, Department::CyberSecurity])
        );
    }

    #[test]
    fn test_department_check_serialization() {
        let check: DepartmentCheck = serde_json::from_str("\"not_supported\"").unwrap();
        assert_eq!(check, DepartmentCheck::NotSupported);
        assert_eq!(DepartmentCheck::NotSpecific.as_str(), "not_specific");
    }
}
