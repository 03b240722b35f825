//! LLM provider domain models and traits

mod error;
mod message;
mod provider;
mod request;
mod response;

pub use error::{ProviderError, ProviderErrorKind};
pub use message::{Conversation, Message, MessageRole};
pub use provider::{BackendKind, LlmProvider};
pub use request::{ChatOptions, DEFAULT_TEMPERATURE};
pub use response::{FinishReason, LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock::{CallLog, MockLlmProvider};
