use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatOptions, Conversation, LlmResponse, ProviderError};

/// Where a backend runs; drives cost policy and response annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    Remote,
}

/// Uniform interface to a single LLM backend
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(
        &self,
        conversation: &Conversation,
        options: &ChatOptions,
    ) -> Result<LlmResponse, ProviderError>;

    /// Backend id used in routing policy, stats and logs
    fn name(&self) -> &str;

    fn kind(&self) -> BackendKind;

    /// Deadline applied to every call to this backend
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::llm::{Message, ProviderErrorKind};

    /// Shared log of backend names in the order they were called
    pub type CallLog = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: String,
        kind: BackendKind,
        timeout: Duration,
        model: String,
        content: String,
        error: Option<ProviderErrorKind>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        call_log: Option<CallLog>,
    }

    impl MockLlmProvider {
        pub fn new(name: impl Into<String>, kind: BackendKind) -> Self {
            let name = name.into();
            Self {
                model: format!("{}-model", name),
                content: format!("answer from {}", name),
                name,
                kind,
                timeout: Duration::from_secs(5),
                error: None,
                delay: None,
                calls: AtomicUsize::new(0),
                call_log: None,
            }
        }

        pub fn with_content(mut self, content: impl Into<String>) -> Self {
            self.content = content.into();
            self
        }

        pub fn with_error(mut self, kind: ProviderErrorKind) -> Self {
            self.error = Some(kind);
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        pub fn with_call_log(mut self, log: CallLog) -> Self {
            self.call_log = Some(log);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(
            &self,
            _conversation: &Conversation,
            _options: &ChatOptions,
        ) -> Result<LlmResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref log) = self.call_log {
                log.lock().unwrap().push(self.name.clone());
            }

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(kind) = self.error {
                return Err(ProviderError::new(kind, &self.name, "mock failure"));
            }

            Ok(LlmResponse::new(
                format!("mock-{}", self.name),
                &self.model,
                Message::assistant(&self.content),
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
}
