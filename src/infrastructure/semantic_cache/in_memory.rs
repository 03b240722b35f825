//! In-memory vector index

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{CacheEntry, SearchHit, VectorIndex};

#[derive(Debug, Default)]
struct IndexState {
    /// id -> (insertion sequence, entry)
    entries: HashMap<String, (u64, CacheEntry)>,
    next_seq: u64,
}

/// In-memory vector index using linear search
///
/// Suitable for a single gateway process. When `max_entries` is non-zero the
/// oldest-inserted entry is evicted to make room for a new id.
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    state: RwLock<IndexState>,
    max_entries: usize,
}

impl InMemoryVectorIndex {
    /// `max_entries == 0` means unbounded
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            max_entries,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    fn evict_oldest(state: &mut IndexState) {
        if let Some(oldest_id) = state
            .entries
            .iter()
            .min_by_key(|(_, (seq, _))| *seq)
            .map(|(id, _)| id.clone())
        {
            state.entries.remove(&oldest_id);
            tracing::debug!(entry = %oldest_id, "Evicted oldest cache entry");
        }
    }
}

fn by_similarity_desc(a: &(f32, &CacheEntry), b: &(f32, &CacheEntry)) -> Ordering {
    b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal)
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>, DomainError> {
        let state = self
            .state
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))?;

        if k == 0 {
            return Ok(Vec::new());
        }

        // Score by reference; only the winners are cloned
        let mut scored: Vec<(f32, &CacheEntry)> = state
            .entries
            .values()
            .map(|(_, entry)| (cosine_similarity(vector, entry.vector()), entry))
            .collect();

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_similarity_desc);
            scored.truncate(k);
        }
        scored.sort_by(by_similarity_desc);

        Ok(scored
            .into_iter()
            .map(|(similarity, entry)| SearchHit::new(entry.clone(), similarity))
            .collect())
    }

    async fn upsert(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))?;

        let is_new = !state.entries.contains_key(entry.id());
        if is_new && self.max_entries > 0 && state.entries.len() >= self.max_entries {
            Self::evict_oldest(&mut state);
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(entry.id().to_string(), (seq, entry));

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))?;

        *state = IndexState::default();

        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let state = self
            .state
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))?;

        Ok(state.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponse, Message};
    use std::sync::Arc;

    fn entry(text: &str, vector: Vec<f32>) -> CacheEntry {
        let response = LlmResponse::new("id", "model", Message::assistant(format!("re: {}", text)), "groq");
        CacheEntry::new(text, vector, response)
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let index = InMemoryVectorIndex::unbounded();

        assert!(index.nearest(&[1.0, 0.0], 1).await.unwrap().is_empty());
        assert_eq!(index.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_nearest_ordering() {
        let index = InMemoryVectorIndex::unbounded();
        index.upsert(entry("far", vec![0.0, 1.0])).await.unwrap();
        index.upsert(entry("close", vec![0.9, 0.1])).await.unwrap();
        index.upsert(entry("exact", vec![1.0, 0.0])).await.unwrap();

        let hits = index.nearest(&[1.0, 0.0], 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.canonical_text(), "exact");
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].entry.canonical_text(), "close");
    }

    #[tokio::test]
    async fn test_nearest_picks_top_k_from_many() {
        let index = InMemoryVectorIndex::unbounded();
        for i in 0..200 {
            let angle = i as f32 / 100.0;
            index
                .upsert(entry(&format!("e{}", i), vec![angle.cos(), angle.sin()]))
                .await
                .unwrap();
        }

        let hits = index.nearest(&[1.0, 0.0], 3).await.unwrap();
        let texts: Vec<&str> = hits.iter().map(|hit| hit.entry.canonical_text()).collect();

        assert_eq!(texts, vec!["e0", "e1", "e2"]);
        assert!(hits[0].similarity >= hits[1].similarity);
        assert!(hits[1].similarity >= hits[2].similarity);
    }

    #[tokio::test]
    async fn test_nearest_with_zero_k() {
        let index = InMemoryVectorIndex::unbounded();
        index.upsert(entry("a", vec![1.0, 0.0])).await.unwrap();

        assert!(index.nearest(&[1.0, 0.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_text_overwrites() {
        let index = InMemoryVectorIndex::unbounded();
        index.upsert(entry("same", vec![1.0, 0.0])).await.unwrap();
        index.upsert(entry("same", vec![0.0, 1.0])).await.unwrap();

        assert_eq!(index.len().await.unwrap(), 1);

        let hits = index.nearest(&[0.0, 1.0], 1).await.unwrap();
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_eviction_removes_oldest() {
        let index = InMemoryVectorIndex::new(2);
        index.upsert(entry("first", vec![1.0, 0.0])).await.unwrap();
        index.upsert(entry("second", vec![0.0, 1.0])).await.unwrap();
        index.upsert(entry("third", vec![1.0, 1.0])).await.unwrap();

        assert_eq!(index.len().await.unwrap(), 2);

        let texts: Vec<String> = index
            .nearest(&[1.0, 1.0], 10)
            .await
            .unwrap()
            .into_iter()
            .map(|hit| hit.entry.canonical_text().to_string())
            .collect();

        assert!(!texts.contains(&"first".to_string()));
        assert!(texts.contains(&"second".to_string()));
        assert!(texts.contains(&"third".to_string()));
    }

    #[tokio::test]
    async fn test_overwrite_at_capacity_does_not_evict() {
        let index = InMemoryVectorIndex::new(2);
        index.upsert(entry("first", vec![1.0, 0.0])).await.unwrap();
        index.upsert(entry("second", vec![0.0, 1.0])).await.unwrap();
        index.upsert(entry("first", vec![1.0, 0.1])).await.unwrap();

        assert_eq!(index.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clear_leaves_index_operational() {
        let index = InMemoryVectorIndex::unbounded();
        index.upsert(entry("a", vec![1.0])).await.unwrap();
        index.clear().await.unwrap();

        assert_eq!(index.len().await.unwrap(), 0);

        index.upsert(entry("b", vec![1.0])).await.unwrap();
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_concurrent_with_lookups() {
        let index = Arc::new(InMemoryVectorIndex::unbounded());
        for i in 0..50 {
            index
                .upsert(entry(&format!("text {}", i), vec![1.0, i as f32]))
                .await
                .unwrap();
        }

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let index = Arc::clone(&index);
            tasks.spawn(async move {
                let hits = index.nearest(&[1.0, 0.0], 100).await.unwrap();
                // Either the full old state or the cleared state
                assert!(hits.is_empty() || hits.len() == 50);
            });
        }

        let clearer = Arc::clone(&index);
        tasks.spawn(async move {
            clearer.clear().await.unwrap();
        });

        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        assert_eq!(index.len().await.unwrap(), 0);
    }
}
