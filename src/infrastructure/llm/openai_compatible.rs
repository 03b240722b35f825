use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    BackendKind, ChatOptions, Conversation, FinishReason, LlmProvider, LlmResponse, Message,
    ProviderError, Usage,
};

/// Any backend speaking the OpenAI chat completions protocol
///
/// Serves the local LM Studio server (no auth), Groq and OpenAI.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider<C: HttpClientTrait> {
    client: C,
    name: String,
    kind: BackendKind,
    base_url: String,
    model: String,
    auth_header: Option<String>,
    timeout: Duration,
}

impl<C: HttpClientTrait> OpenAiCompatibleProvider<C> {
    pub fn new(
        client: C,
        name: impl Into<String>,
        kind: BackendKind,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            name: name.into(),
            kind,
            base_url,
            model: model.into(),
            auth_header: None,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.as_ref()));
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, conversation: &Conversation, options: &ChatOptions) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> = conversation
            .messages()
            .iter()
            .map(OpenAiMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": options.temperature_or_default(),
        });

        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, ProviderError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            ProviderError::invalid_response(&self.name, format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::invalid_response(&self.name, "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());
        let id = response
            .id
            .unwrap_or_else(|| format!("chatcmpl-{}", uuid::Uuid::new_v4()));
        let model = response.model.unwrap_or_else(|| self.model.clone());

        let mut llm_response = LlmResponse::new(id, model, message, &self.name);

        if let Some(created) = response.created {
            llm_response = llm_response.with_created(created);
        }

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiCompatibleProvider<C> {
    async fn chat(
        &self,
        conversation: &Conversation,
        options: &ChatOptions,
    ) -> Result<LlmResponse, ProviderError> {
        let url = self.chat_completions_url();
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
        self.kind
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> OpenAiMessage<'a> {
    fn from_domain(message: &'a Message) -> Self {
        Self {
            role: message.role().as_str(),
            content: message.content(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: Option<String>,
    created: Option<i64>,
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::ProviderErrorKind;
    use crate::infrastructure::llm::http_client::HttpError;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

    fn conversation() -> Conversation {
        Conversation::new(vec![Message::user("Hello!")]).unwrap()
    }

    fn groq(client: MockHttpClient) -> OpenAiCompatibleProvider<MockHttpClient> {
        OpenAiCompatibleProvider::new(
            client,
            "groq",
            BackendKind::Remote,
            "https://api.groq.com/openai/v1/",
            "llama-3.1-8b-instant",
            Duration::from_secs(30),
        )
        .with_api_key("test-key")
    }

    #[tokio::test]
    async fn test_chat_normalizes_response() {
        let mock_response = serde_json::json!({
            "id": "chatcmpl-123",
            "created": 1700000000,
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "message": { "role": "assistant", "content": "Hello! How can I help you?" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18 }
        });

        let provider = groq(MockHttpClient::new().with_response(GROQ_URL, mock_response));
        let response = provider
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.created, 1700000000);
        assert_eq!(response.model, "llama-3.1-8b-instant");
        assert_eq!(response.content(), "Hello! How can I help you?");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.provider, "groq");
        assert_eq!(response.usage.unwrap().total_tokens, 18);
    }

    #[tokio::test]
    async fn test_request_body_and_auth() {
        let mock_response = serde_json::json!({
            "choices": [{ "message": { "content": "ok" } }]
        });
        let client = MockHttpClient::new().with_response(GROQ_URL, mock_response);
        let provider = groq(client);

        let options = ChatOptions::new().with_max_tokens(64);
        let response = provider.chat(&conversation(), &options).await.unwrap();

        let body = provider.client.last_body(GROQ_URL).unwrap();
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello!");
        assert_eq!(body["max_tokens"], 64);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            provider.client.last_header(GROQ_URL, "authorization").as_deref(),
            Some("Bearer test-key")
        );

        // Missing id and model are filled in
        assert!(response.id.starts_with("chatcmpl-"));
        assert_eq!(response.model, "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_local_backend_sends_no_auth() {
        let url = "http://localhost:1234/v1/chat/completions";
        let client = MockHttpClient::new()
            .with_response(url, serde_json::json!({"choices": [{"message": {"content": "hi"}}]}));
        let provider = OpenAiCompatibleProvider::new(
            client,
            "local",
            BackendKind::Local,
            "http://localhost:1234/v1",
            "mythomax-l2-13b",
            Duration::from_secs(120),
        );

        provider.chat(&conversation(), &ChatOptions::new()).await.unwrap();

        assert_eq!(provider.client.last_header(url, "authorization"), None);
        assert_eq!(provider.timeout(), Duration::from_secs(120));
        assert_eq!(provider.kind(), BackendKind::Local);
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let provider =
            groq(MockHttpClient::new().with_response(GROQ_URL, serde_json::json!({"choices": []})));

        let error = provider
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ProviderErrorKind::InvalidResponse);
        assert_eq!(error.backend, "groq");
    }

    #[tokio::test]
    async fn test_http_error_is_mapped() {
        let provider = groq(MockHttpClient::new().with_error(
            GROQ_URL,
            HttpError::Status {
                status: 401,
                body: "invalid api key".to_string(),
            },
        ));

        let error = provider
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ProviderErrorKind::HttpStatus(401));
    }

    #[tokio::test]
    async fn test_against_fake_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-live",
                "model": "gpt-4o",
                "choices": [{
                    "message": { "role": "assistant", "content": "Paris" },
                    "finish_reason": "length"
                }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new(
            HttpClient::new(),
            "openai",
            BackendKind::Remote,
            format!("{}/v1", server.uri()),
            "gpt-4o",
            Duration::from_secs(5),
        )
        .with_api_key("sk-test");

        let response = provider
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap();

        assert_eq!(response.content(), "Paris");
        assert_eq!(response.finish_reason, FinishReason::Length);
    }

    #[tokio::test]
    async fn test_server_error_and_timeout_against_fake_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/slow/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/broken/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let slow = OpenAiCompatibleProvider::new(
            HttpClient::new(),
            "local",
            BackendKind::Local,
            format!("{}/slow", server.uri()),
            "m",
            Duration::from_millis(50),
        );
        let error = slow
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ProviderErrorKind::Timeout);

        let broken = OpenAiCompatibleProvider::new(
            HttpClient::new(),
            "groq",
            BackendKind::Remote,
            format!("{}/broken", server.uri()),
            "m",
            Duration::from_secs(5),
        );
        let error = broken
            .chat(&conversation(), &ChatOptions::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ProviderErrorKind::HttpStatus(500));
    }
}
