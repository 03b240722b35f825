//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for turning text into fixed-length vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Length of every vector this provider produces
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Returns a fixed vector, or fails, regardless of input
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        vector: Vec<f32>,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(vector: Vec<f32>) -> Self {
            Self {
                vector,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::embedding(error));
            }

            Ok(self.vector.clone())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn dimensions(&self) -> usize {
            self.vector.len()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new(vec![1.0]).with_error("model offline");
            assert!(provider.embed("Hello").await.is_err());
        }
    }
}
