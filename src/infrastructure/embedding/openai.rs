//! OpenAI-compatible embedding provider

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::DomainError;
use crate::domain::embedding::EmbeddingProvider;

const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(10);

/// Embeds text through any `/embeddings` endpoint speaking the OpenAI protocol
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(
        client: C,
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client,
            auth_header: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
        }
    }

    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.as_ref()));
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "input": text,
            "dimensions": self.dimensions,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::embedding("No embedding in response"))?;

        if embedding.len() != self.dimensions {
            return Err(DomainError::embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(text);

        let response = self
            .client
            .post_json(&url, self.headers(), &body, EMBEDDING_TIMEOUT)
            .await
            .map_err(|e| DomainError::embedding(e.to_string()))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// OpenAI API types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}
