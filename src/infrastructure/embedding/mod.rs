//! Embedding provider implementations

mod hash;
mod openai;

use std::sync::Arc;

pub use hash::HashEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::{EmbeddingBackend, EmbeddingConfig};

/// Build the configured embedder
pub fn create_embedding_provider(config: &EmbeddingConfig) -> Arc<dyn EmbeddingProvider> {
    match config.provider {
        EmbeddingBackend::Hash => Arc::new(HashEmbeddingProvider::new(config.dimensions)),
        EmbeddingBackend::OpenAi => {
            let mut provider = OpenAiEmbeddingProvider::new(
                HttpClient::new(),
                &config.base_url,
                &config.model,
                config.dimensions,
            );

            if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
                provider = provider.with_api_key(key);
            }

            Arc::new(provider)
        }
    }
}
