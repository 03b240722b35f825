use serde::{Deserialize, Serialize};

/// Default sampling temperature sent to backends
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-request generation options passed through to the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}
