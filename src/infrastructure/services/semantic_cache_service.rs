//! Semantic response cache
//!
//! Returns a stored response when a new conversation embeds close enough to
//! one answered before. Failures are returned to the caller, which decides
//! whether to degrade them to a miss.

use std::sync::Arc;

use tracing::debug;

use crate::domain::DomainError;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::llm::{Conversation, LlmResponse};
use crate::domain::semantic_cache::{CacheEntry, SemanticCacheConfig, VectorIndex};

/// A cached response and how close its conversation was
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub response: LlmResponse,
    pub similarity: f32,
}

/// Semantic cache over a vector index and an embedder
pub struct SemanticCacheService {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
}

impl std::fmt::Debug for SemanticCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCacheService")
            .field("embedder", &self.embedder.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl SemanticCacheService {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }

    /// Default similarity threshold for lookups
    pub fn threshold(&self) -> f32 {
        self.config.similarity_threshold
    }

    /// Embedding of the conversation; identical conversations give identical vectors
    pub async fn fingerprint(&self, conversation: &Conversation) -> Result<Vec<f32>, DomainError> {
        self.embedder.embed(&conversation.fingerprint_text()).await
    }

    /// Nearest stored response if its similarity reaches `threshold`
    pub async fn lookup(
        &self,
        conversation: &Conversation,
        threshold: f32,
    ) -> Result<Option<CacheHit>, DomainError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let vector = self.fingerprint(conversation).await?;
        let best = self.index.nearest(&vector, 1).await?.into_iter().next();

        match best {
            Some(hit) if hit.similarity >= threshold => {
                debug!(
                    similarity = hit.similarity,
                    entry = %hit.entry.id(),
                    "Semantic cache match"
                );

                Ok(Some(CacheHit {
                    similarity: hit.similarity,
                    response: hit.entry.into_response(),
                }))
            }
            Some(hit) => {
                debug!(
                    similarity = hit.similarity,
                    threshold, "Nearest cache entry below threshold"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Insert or overwrite the entry for this conversation
    pub async fn store(
        &self,
        conversation: &Conversation,
        response: &LlmResponse,
    ) -> Result<(), DomainError> {
        if !self.config.enabled {
            return Ok(());
        }

        let vector = self.fingerprint(conversation).await?;

        let mut response = response.clone();
        response.cached = false;

        self.index
            .upsert(CacheEntry::new(conversation.canonical_text(), vector, response))
            .await
    }

    pub async fn clear(&self) -> Result<(), DomainError> {
        self.index.clear().await
    }

    pub async fn len(&self) -> Result<usize, DomainError> {
        self.index.len().await
    }
}
