/// Deterministic `EmbeddingProvider` stub: a fixed-width hash embedding, so
/// cosine similarity over mock vectors is stable across runs without a real
/// embedding model. Generalizes the hash-embedder test double used across
/// the retrieval crate's own unit tests into a reusable public type.
use async_trait::async_trait;
use replyforge_core::{EmbeddingProvider, ProviderError};

const DIMENSIONS: usize = 32;

pub struct MockEmbeddingProvider;

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn embed_one(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIMENSIONS];
    for (idx, word) in text.split_whitespace().enumerate() {
        let mut hash: u64 = 1469598103934665603;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(1099511628211);
        }
        let bucket = (hash as usize + idx) % DIMENSIONS;
        vector[bucket] += 1.0;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_yields_identical_vectors() {
        let provider = MockEmbeddingProvider::new();
        let vectors = provider.embed(&["hello world".to_string(), "hello world".to_string()]).await.unwrap();
        assert_eq!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let provider = MockEmbeddingProvider::new();
        let vectors = provider.embed(&["a somewhat longer sentence of text".to_string()]).await.unwrap();
        let norm = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn distinct_text_yields_distinct_vectors() {
        let provider = MockEmbeddingProvider::new();
        let vectors = provider.embed(&["invoice payment overdue".to_string(), "birthday party invitation".to_string()]).await.unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }
}
