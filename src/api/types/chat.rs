//! OpenAI-compatible chat completion types

use serde::{Deserialize, Serialize};

use crate::domain::llm::{
    ChatOptions, Conversation, FinishReason, LlmResponse, Message, MessageRole,
};
use crate::domain::DomainError;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
}

impl From<ChatMessageRole> for MessageRole {
    fn from(role: ChatMessageRole) -> Self {
        match role {
            ChatMessageRole::System => Self::System,
            ChatMessageRole::User => Self::User,
            ChatMessageRole::Assistant => Self::Assistant,
        }
    }
}

impl From<MessageRole> for ChatMessageRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::System => Self::System,
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Assistant,
        }
    }
}

/// Content part for array-style message content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
}

/// Message content - can be text or array of content parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content, concatenating parts if needed
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Parts(parts) => parts
                .iter()
                .map(|ContentPart::Text { text }| text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A chat message in OpenAI format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl From<&ChatMessage> for Message {
    fn from(message: &ChatMessage) -> Self {
        let content = message
            .content
            .as_ref()
            .map(MessageContent::to_text)
            .unwrap_or_default();

        Message::new(message.role.into(), content)
    }
}

/// Chat completion request (OpenAI format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Accepted for client compatibility; the gateway picks the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub messages: Vec<ChatMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Domain conversation; fails when no messages were sent
    pub fn conversation(&self) -> Result<Conversation, DomainError> {
        Conversation::new(self.messages.iter().map(Message::from).collect())
    }

    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<&crate::domain::llm::Usage> for Usage {
    fn from(usage: &crate::domain::llm::Usage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// Assistant message in a response choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

/// A choice in the chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ChoiceMessage,
    pub finish_reason: FinishReason,
}

/// Chat completion response (OpenAI format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl From<&LlmResponse> for ChatCompletionResponse {
    fn from(response: &LlmResponse) -> Self {
        Self {
            id: response.id.clone(),
            object: "chat.completion".to_string(),
            created: response.created,
            model: response.model.clone(),
            choices: vec![ChatCompletionChoice {
                index: 0,
                message: ChoiceMessage {
                    role: ChatMessageRole::Assistant,
                    content: response.content().to_string(),
                },
                finish_reason: response.finish_reason,
            }],
            usage: response.usage.as_ref().map(Usage::from),
        }
    }
}
