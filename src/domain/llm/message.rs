use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: MessageRole,
    content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered dialogue history submitted for completion
///
/// Always holds at least one message; order is preserved exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Result<Self, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::invalid_request("Messages required"));
        }

        Ok(Self(messages))
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical serialization; identifies cache entries
    pub fn canonical_text(&self) -> String {
        // Vec<Message> of plain strings cannot fail to serialize
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// One "role: content" line per message; the text the cache embeds
    pub fn fingerprint_text(&self) -> String {
        self.0
            .iter()
            .map(|m| format!("{}: {}", m.role().as_str(), m.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All message contents joined by a single space
    pub fn combined_text(&self) -> String {
        self.0
            .iter()
            .map(Message::content)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn last_content(&self) -> &str {
        self.0.last().map(Message::content).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role(), MessageRole::User);
        assert_eq!(msg.content(), "Hello");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::assistant("Hi there!");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hi there!"}"#);
    }

    #[test]
    fn test_empty_conversation_rejected() {
        let result = Conversation::new(vec![]);
        assert!(matches!(result, Err(DomainError::InvalidRequest { .. })));
    }

    #[test]
    fn test_canonical_text_preserves_order() {
        let conversation = Conversation::new(vec![
            Message::system("Be brief"),
            Message::user("What is 2+2?"),
        ])
        .unwrap();

        assert_eq!(
            conversation.canonical_text(),
            r#"[{"role":"system","content":"Be brief"},{"role":"user","content":"What is 2+2?"}]"#
        );

        let reversed = Conversation::new(vec![
            Message::user("What is 2+2?"),
            Message::system("Be brief"),
        ])
        .unwrap();

        assert_ne!(conversation.canonical_text(), reversed.canonical_text());
    }

    #[test]
    fn test_combined_and_last_content() {
        let conversation =
            Conversation::new(vec![Message::user("first"), Message::assistant("second")]).unwrap();

        assert_eq!(conversation.combined_text(), "first second");
        assert_eq!(
            conversation.fingerprint_text(),
            "user: first\nassistant: second"
        );
        assert_eq!(conversation.last_content(), "second");
        assert_eq!(conversation.len(), 2);
    }
}
