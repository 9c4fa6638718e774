//! Vector index domain: passages, metadata filters and the search trait

mod filter;
mod passage;
mod provider;

pub use filter::{FilterCondition, FilterConnector, FilterOperator, FilterValue, MetadataFilter};
pub use passage::{
    NewPassage, Passage, BATCH_KEY, DEPARTMENT_KEY, DOMAIN_KEY, IMAGE_URL_KEY, KIND_KEY,
};
pub use provider::{SearchParams, VectorIndex};
