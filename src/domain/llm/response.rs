use serde::{Deserialize, Serialize};

use super::Message;

/// Reason why the generation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
}

impl FinishReason {
    /// Parse an OpenAI-style finish reason string
    pub fn parse(reason: &str) -> Self {
        match reason {
            "length" | "MAX_TOKENS" => Self::Length,
            "content_filter" | "SAFETY" | "RECITATION" => Self::ContentFilter,
            "tool_calls" | "function_call" => Self::ToolCalls,
            _ => Self::Stop,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Normalized response from any backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub id: String,
    /// Unix timestamp in seconds
    pub created: i64,
    pub model: String,
    pub message: Message,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Backend id that produced this response
    pub provider: String,
    /// Served from the semantic cache
    #[serde(default)]
    pub cached: bool,
}

impl LlmResponse {
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        message: Message,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created: chrono::Utc::now().timestamp(),
            model: model.into(),
            message,
            finish_reason: FinishReason::Stop,
            usage: None,
            provider: provider.into(),
            cached: false,
        }
    }

    pub fn with_created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn content(&self) -> &str {
        self.message.content()
    }
}
