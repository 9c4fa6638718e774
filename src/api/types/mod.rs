//! Request and response bodies of the HTTP API

pub mod chat;
pub mod corpus;
pub mod error;
pub mod json;

pub use chat::{ChatRequest, ChatResponse, ThreadHistoryResponse};
pub use corpus::{DeleteResponse, IngestRequest, IngestResponse, PassageInput};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
