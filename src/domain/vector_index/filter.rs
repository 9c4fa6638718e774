//! Metadata filtering for vector index queries

use serde::{Deserialize, Serialize};

/// Comparison operators for metadata filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equal to
    Eq,
    /// Not equal to
    Ne,
    /// In list of values
    In,
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::In => write!(f, "in"),
        }
    }
}

/// Logical connectors for combining filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterConnector {
    #[default]
    And,
    Or,
}

/// Filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    List(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl FilterValue {
    /// Whether a metadata string satisfies this value under the operator
    pub fn matches(&self, operator: FilterOperator, actual: Option<&str>) -> bool {
        match (operator, self) {
            (FilterOperator::Eq, Self::String(expected)) => actual == Some(expected.as_str()),
            (FilterOperator::Ne, Self::String(expected)) => actual != Some(expected.as_str()),
            (FilterOperator::In, Self::List(values)) => {
                actual.is_some_and(|a| values.iter().any(|v| v == a))
            }
            (FilterOperator::In, Self::String(expected)) => actual == Some(expected.as_str()),
            (_, Self::List(_)) => false,
        }
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Metadata field key
    pub key: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(key: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            key: key.into(),
            operator,
            value,
        }
    }

    /// Create an equality condition
    pub fn eq(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Eq, value.into())
    }

    /// Create a not-equal condition
    pub fn ne(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Ne, value.into())
    }

    /// Create an in-list condition
    pub fn in_list(key: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(key, FilterOperator::In, FilterValue::List(values))
    }
}

/// A metadata filter that can be a single condition or a group of conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataFilter {
    Condition(FilterCondition),
    Group {
        connector: FilterConnector,
        filters: Vec<MetadataFilter>,
    },
}

impl MetadataFilter {
    pub fn condition(condition: FilterCondition) -> Self {
        Self::Condition(condition)
    }

    /// Create an AND group of filters
    pub fn and(filters: Vec<MetadataFilter>) -> Self {
        Self::Group {
            connector: FilterConnector::And,
            filters,
        }
    }

    /// Create an OR group of filters
    pub fn or(filters: Vec<MetadataFilter>) -> Self {
        Self::Group {
            connector: FilterConnector::Or,
            filters,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Condition(_) => false,
            Self::Group { filters, .. } => filters.is_empty(),
        }
    }

    /// Evaluate the filter against a metadata lookup
    pub fn evaluate<'a>(&self, lookup: &impl Fn(&str) -> Option<&'a str>) -> bool {
        match self {
            Self::Condition(c) => c.value.matches(c.operator, lookup(&c.key)),
            Self::Group { connector, filters } => match connector {
                FilterConnector::And => filters.iter().all(|f| f.evaluate(lookup)),
                FilterConnector::Or => {
                    filters.is_empty() || filters.iter().any(|f| f.evaluate(lookup))
                }
            },
        }
    }

    /// Flatten a filter into plain conditions when it is a pure AND of conditions
    pub fn conjunction(&self) -> Option<Vec<&FilterCondition>> {
        match self {
            Self::Condition(c) => Some(vec![c]),
            Self::Group {
                connector: FilterConnector::And,
                filters,
            } => {
                let mut out = Vec::with_capacity(filters.len());
                for filter in filters {
                    out.extend(filter.conjunction()?);
                }
                Some(out)
            }
            Self::Group { .. } => None,
        }
    }
}
