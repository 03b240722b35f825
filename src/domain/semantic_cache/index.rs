//! Vector index trait and cache entry types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;
use crate::domain::llm::LlmResponse;

/// A cached response keyed by the fingerprint of its conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    id: String,
    vector: Vec<f32>,
    canonical_text: String,
    response: LlmResponse,
}

impl CacheEntry {
    /// Create an entry; the id is derived from the canonical text
    pub fn new(canonical_text: impl Into<String>, vector: Vec<f32>, response: LlmResponse) -> Self {
        let canonical_text = canonical_text.into();

        Self {
            id: Self::id_for(&canonical_text),
            vector,
            canonical_text,
            response,
        }
    }

    /// Stable entry id: hex SHA-256 of the canonical text
    pub fn id_for(canonical_text: &str) -> String {
        hex::encode(Sha256::digest(canonical_text.as_bytes()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    pub fn response(&self) -> &LlmResponse {
        &self.response
    }

    pub fn into_response(self) -> LlmResponse {
        self.response
    }
}

/// A nearest-neighbour match
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: CacheEntry,
    /// Cosine similarity to the query vector
    pub similarity: f32,
}

impl SearchHit {
    pub fn new(entry: CacheEntry, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// Nearest-neighbour store behind the semantic cache
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `k` entries sorted by descending similarity
    async fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>, DomainError>;

    /// Insert or overwrite the entry with the same id
    async fn upsert(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Remove every entry atomically
    async fn clear(&self) -> Result<(), DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;
}
