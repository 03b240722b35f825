//! OpenAI-compatible API types
//!
//! These types mirror the OpenAI API format for compatibility.

pub mod chat;
pub mod error;
pub mod json;
pub mod stats;

pub use chat::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ChatMessageRole, ChoiceMessage, ContentPart, MessageContent, Usage,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use stats::{CacheClearResponse, LatestRequestResponse, StatsResponse};
