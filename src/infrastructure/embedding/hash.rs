//! Offline feature-hashing embedder

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::embedding::{EmbeddingProvider, l2_normalize};
use crate::domain::DomainError;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;
const BIGRAM_WEIGHT: f32 = 2.0;
const POSITION_WEIGHT: f32 = 2.0;

/// Sentence punctuation carries no meaning for matching; other symbols do
const SOFT_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"', '`'];

/// Deterministic embedder that hashes text features into buckets
///
/// Each line contributes its words, their character trigrams, adjacent word
/// pairs and the words tagged with the line number. Operators such as `+` or
/// `=` are tokens of their own. Word order and line order both move the
/// vector, while case and sentence punctuation do not.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Synchronous embedding used by the blocking task
    pub fn embed_sync(text: &str, dimensions: usize) -> Vec<f32> {
        let mut vector = vec![0.0f32; dimensions];

        if dimensions == 0 {
            return vector;
        }

        for (line_no, line) in text.lines().enumerate() {
            let tokens = tokenize(line);

            for token in &tokens {
                add_feature(&mut vector, &format!("w:{}", token), WORD_WEIGHT);
                add_feature(&mut vector, &format!("p{}:{}", line_no, token), POSITION_WEIGHT);

                let padded: Vec<char> = format!("#{}#", token).chars().collect();
                for trigram in padded.windows(3) {
                    let trigram: String = trigram.iter().collect();
                    add_feature(&mut vector, &format!("c:{}", trigram), TRIGRAM_WEIGHT);
                }
            }

            for pair in tokens.windows(2) {
                add_feature(&mut vector, &format!("b:{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

/// Lowercased alphanumeric runs plus every symbol outside sentence punctuation
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in line.chars() {
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            continue;
        }

        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }

        if !c.is_whitespace() && !SOFT_PUNCTUATION.contains(&c) {
            tokens.push(c.to_string());
        }
    }

    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

fn add_feature(vector: &mut [f32], feature: &str, weight: f32) {
    let digest = Sha256::digest(feature.as_bytes());

    let mut bucket_bytes = [0u8; 8];
    bucket_bytes.copy_from_slice(&digest[..8]);
    let bucket = (u64::from_le_bytes(bucket_bytes) % vector.len() as u64) as usize;

    let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
    vector[bucket] += sign * weight;
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let text = text.to_string();
        let dimensions = self.dimensions;

        tokio::task::spawn_blocking(move || Self::embed_sync(&text, dimensions))
            .await
            .map_err(|e| DomainError::embedding(format!("Embedding task failed: {}", e)))
    }

    fn provider_name(&self) -> &'static str {
        "hash"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
