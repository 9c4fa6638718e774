//! Chat endpoint bodies

use serde::{Deserialize, Serialize};

use crate::domain::session::{ThreadId, Turn};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// Continue an existing thread; a fresh one is created when absent
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub thread_id: ThreadId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadHistoryResponse {
    pub thread_id: ThreadId,
    pub turns: Vec<Turn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_is_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"query": "졸업 요건"}"#).unwrap();
        assert_eq!(request.query, "졸업 요건");
        assert!(request.thread_id.is_none());
    }

    #[test]
    fn test_response_shape() {
        let response = ChatResponse {
            response: "답변".to_string(),
            thread_id: ThreadId::new("abc"),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"response": "답변", "thread_id": "abc"})
        );
    }
}
