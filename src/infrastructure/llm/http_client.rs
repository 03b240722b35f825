use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::llm::{ProviderError, ProviderErrorKind};

/// Transport-level failure of a JSON POST
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl HttpError {
    /// Map onto the uniform provider error for `backend`
    pub fn into_provider_error(self, backend: &str) -> ProviderError {
        let kind = match &self {
            Self::Timeout => ProviderErrorKind::Timeout,
            Self::Transport(_) => ProviderErrorKind::Transport,
            Self::Status { status, .. } => ProviderErrorKind::HttpStatus(*status),
            Self::Decode(_) => ProviderErrorKind::InvalidResponse,
        };

        ProviderError::new(kind, backend, self.to_string())
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }

        // Drop the URL so query-string credentials can never leak
        let error = error.without_url();

        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, HttpError> {
        let mut request = self.client.post(url).timeout(timeout);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(HttpError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(HttpError::from_reqwest)
    }
}
