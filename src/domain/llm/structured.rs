//! Structured (schema-constrained) model output

use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// A reply shape the model is asked to produce as a JSON object.
///
/// `NAME` doubles as the schema name sent to the provider.
pub trait StructuredOutput: DeserializeOwned + Send + Sized {
    const NAME: &'static str;

    fn json_schema() -> serde_json::Value;

    /// Decode a raw model reply into this shape
    fn decode(content: &str) -> Result<Self, DomainError> {
        let json_str = extract_json(content).unwrap_or(content);

        serde_json::from_str(json_str).map_err(|e| {
            tracing::warn!(schema = Self::NAME, error = %e, reply = %content, "Failed to decode structured reply");
            DomainError::structured_output(Self::NAME, e.to_string())
        })
    }
}

/// Extract the outermost JSON object from a string (handles prose and code fences)
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Schema for an object whose properties are all required and closed
pub fn object_schema(properties: serde_json::Value) -> serde_json::Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
