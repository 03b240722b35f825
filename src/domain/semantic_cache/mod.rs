//! Semantic cache domain models and traits
//!
//! Matches semantically similar conversations rather than requiring exact
//! key matches.

mod config;
mod index;

pub use config::{EmbeddingBackend, EmbeddingConfig, SemanticCacheConfig};
pub use index::{CacheEntry, SearchHit, VectorIndex};

#[cfg(test)]
pub use index::MockVectorIndex;
