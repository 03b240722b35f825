use std::time::Duration;

use async_trait::async_trait;

use crate::domain::llm::{
    BackendKind, ChatOptions, Conversation, LlmProvider, LlmResponse, Message, ProviderError,
    ProviderErrorKind,
};

const PREVIEW_CHARS: usize = 20;

/// Canned backend used in simulation mode
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    name: String,
    kind: BackendKind,
    model: String,
    latency: Duration,
    fail: bool,
    timeout: Duration,
}

impl SimulatedProvider {
    pub fn new(
        name: impl Into<String>,
        kind: BackendKind,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            model: model.into(),
            latency: Duration::ZERO,
            fail: false,
            timeout,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failure(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }

    fn canned_content(&self, conversation: &Conversation) -> String {
        let preview: String = conversation
            .last_content()
            .chars()
            .take(PREVIEW_CHARS)
            .collect();

        format!(
            "[MOCK {}] Simulated response for: {}...",
            self.name.to_uppercase(),
            preview
        )
    }
}

#[async_trait]
impl LlmProvider for SimulatedProvider {
    async fn chat(
        &self,
        conversation: &Conversation,
        _options: &ChatOptions,
    ) -> Result<LlmResponse, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail {
            return Err(ProviderError::new(
                ProviderErrorKind::Simulated,
                &self.name,
                "configured to fail",
            ));
        }

        Ok(LlmResponse::new(
            format!("sim-{}", uuid::Uuid::new_v4()),
            &self.model,
            Message::assistant(self.canned_content(conversation)),
            &self.name,
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
