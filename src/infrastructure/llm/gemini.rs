use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    BackendKind, ChatOptions, Conversation, FinishReason, LlmProvider, LlmResponse, Message,
    MessageRole, ProviderError, Usage,
};

/// Returned when Gemini withholds every candidate
pub const SAFETY_FALLBACK_TEXT: &str =
    "I'm sorry, but I can't provide a response to that request due to safety restrictions.";

/// Google Gemini generateContent provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    name: String,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(
        client: C,
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Content-Type", "application/json"),
            ("x-goog-api-key", self.api_key.as_str()),
        ]
    }

    fn build_request(&self, conversation: &Conversation, options: &ChatOptions) -> serde_json::Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in conversation.messages() {
            let part = GeminiPart {
                text: message.content().to_string(),
            };

            match message.role() {
                MessageRole::System => system_parts.push(part),
                MessageRole::User => contents.push(GeminiContent {
                    role: "user",
                    parts: vec![part],
                }),
                MessageRole::Assistant => contents.push(GeminiContent {
                    role: "model",
                    parts: vec![part],
                }),
            }
        }

        let mut generation_config = serde_json::json!({
            "temperature": options.temperature_or_default(),
        });

        if let Some(max_tokens) = options.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if !system_parts.is_empty() {
            body["systemInstruction"] = serde_json::json!({ "parts": system_parts });
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, ProviderError> {
        let response: GeminiResponse = serde_json::from_value(json).map_err(|e| {
            ProviderError::invalid_response(&self.name, format!("Failed to parse response: {}", e))
        })?;

        let id = format!("gemini-{}", uuid::Uuid::new_v4());

        let Some(candidate) = response.candidates.into_iter().next() else {
            tracing::warn!(backend = %self.name, "Gemini returned no candidates");

            return Ok(
                LlmResponse::new(id, &self.model, Message::assistant(SAFETY_FALLBACK_TEXT), &self.name)
                    .with_finish_reason(FinishReason::ContentFilter),
            );
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let mut llm_response = LlmResponse::new(id, &self.model, Message::assistant(text), &self.name);

        if let Some(reason) = candidate.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage_metadata {
            llm_response = llm_response.with_usage(Usage::new(
                usage.prompt_token_count,
                usage.candidates_token_count,
            ));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GeminiProvider<C> {
    async fn chat(
        &self,
        conversation: &Conversation,
        options: &ChatOptions,
    ) -> Result<LlmResponse, ProviderError> {
        let url = self.generate_url();
        let body = self.build_request(conversation, options);

        let response = self
            .client
            .post_json(&url, self.headers(), &body, self.timeout)
            .await
            .map_err(|e| e.into_provider_error(&self.name))?;

        self.parse_response(response)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
