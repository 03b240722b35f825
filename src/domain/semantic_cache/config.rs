//! Semantic cache configuration

use serde::{Deserialize, Serialize};

/// Which embedder produces conversation fingerprints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Offline feature-hashing embedder
    #[default]
    Hash,
    /// Any OpenAI-compatible /embeddings endpoint
    OpenAi,
}

/// Embedding settings for the cache fingerprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingBackend,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_dimensions() -> usize {
    384
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::default(),
            dimensions: default_dimensions(),
            model: default_embedding_model(),
            base_url: default_embedding_base_url(),
            api_key: None,
        }
    }
}

/// Configuration for semantic caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Similarity threshold for cache hits (0.0 to 1.0)
    /// Higher values require more similar conversations
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum number of entries to keep; 0 means unbounded
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.9
}

fn default_max_entries() -> usize {
    10000
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            similarity_threshold: default_similarity_threshold(),
            max_entries: default_max_entries(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether caching is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }
}
