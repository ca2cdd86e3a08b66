/// An in-memory vector index over chunked documents, queried by cosine
/// similarity (§3 `Retriever`, §9 "Ephemeral retrievers"). Built fresh per
/// request and discarded when the request ends; never cached across
/// requests or persisted to disk.
use std::sync::Arc;

use replyforge_core::{EmbeddingProvider, ProviderError};

use crate::chunk::Chunker;

#[derive(Clone, Debug)]
struct IndexedChunk {
    text: String,
    source: Option<String>,
    embedding: Vec<f32>,
}

/// One chunk returned from a retriever query, annotated with its source
/// filename when the retriever was built over multiple documents (§4.4).
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

/// A per-request retriever: `top_k(query) -> chunks-with-metadata`.
pub struct Retriever {
    chunks: Vec<IndexedChunk>,
    top_k: usize,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Builds a retriever by chunking each `(text, source)` document,
    /// embedding every chunk, and indexing the result in memory. Returns
    /// `None` if no document yields any non-empty chunk (§4.3, §4.4: "An
    /// empty directory or all-failing files yields nil").
    pub async fn build(
        documents: &[(String, Option<String>)],
        chunker: &Chunker,
        embeddings: Arc<dyn EmbeddingProvider>,
        top_k: usize,
    ) -> Result<Option<Self>, ProviderError> {
        let mut texts = Vec::new();
        let mut sources = Vec::new();
        for (text, source) in documents {
            for chunk in chunker.split(text) {
                sources.push(source.clone());
                texts.push(chunk);
            }
        }

        if texts.is_empty() {
            return Ok(None);
        }

        let vectors = embeddings.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(ProviderError::Empty);
        }

        let chunks = texts
            .into_iter()
            .zip(sources)
            .zip(vectors)
            .map(|((text, source), embedding)| IndexedChunk {
                text,
                source,
                embedding,
            })
            .collect();

        Ok(Some(Self {
            chunks,
            top_k,
            embeddings,
        }))
    }

    /// Embeds `query` and returns the top-k most similar chunks, highest
    /// score first.
    pub async fn query(&self, query: &str) -> Result<Vec<RetrievedChunk>, ProviderError> {
        let query_vec = self
            .embeddings
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::Empty)?;

        let mut scored: Vec<RetrievedChunk> = self
            .chunks
            .iter()
            .map(|c| RetrievedChunk {
                text: c.text.clone(),
                source: c.source.clone(),
                score: cosine_similarity(&query_vec, &c.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let dot: f32 = a[..len].iter().zip(&b[..len]).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a[..len].iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b[..len].iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct HashEmbedder;

    /// A deterministic, order-sensitive fake embedder for tests: maps each
    /// text to a short vector derived from its characters, so similar
    /// strings naturally end up with similar vectors without needing a
    /// live embedding provider.
    #[async_trait]
    impl EmbeddingProvider for HashEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 8];
                    for (i, b) in t.bytes().enumerate() {
                        v[i % 8] += b as f32;
                    }
                    v
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn build_returns_none_for_empty_documents() {
        let chunker = Chunker::new(1000, 100);
        let result = Retriever::build(&[], &chunker, Arc::new(HashEmbedder), 3)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn build_returns_none_when_all_documents_are_blank() {
        let chunker = Chunker::new(1000, 100);
        let docs = vec![("   ".to_string(), None), ("".to_string(), None)];
        let result = Retriever::build(&docs, &chunker, Arc::new(HashEmbedder), 3)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn query_returns_closest_chunks_first() {
        let chunker = Chunker::new(1000, 100);
        let docs = vec![
            ("apple banana cherry".to_string(), Some("fruit.txt".to_string())),
            ("rocket engine turbine".to_string(), Some("space.txt".to_string())),
        ];
        let retriever = Retriever::build(&docs, &chunker, Arc::new(HashEmbedder), 1)
            .await
            .unwrap()
            .unwrap();

        let results = retriever.query("apple banana cherry").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source.as_deref(), Some("fruit.txt"));
    }

    #[tokio::test]
    async fn query_respects_top_k() {
        let chunker = Chunker::new(5, 1);
        let docs = vec![("a".repeat(50), None)];
        let retriever = Retriever::build(&docs, &chunker, Arc::new(HashEmbedder), 2)
            .await
            .unwrap()
            .unwrap();
        let results = retriever.query("aaaaa").await.unwrap();
        assert!(results.len() <= 2);
    }

    #[test]
    fn cosine_similarity_is_one_for_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_is_zero_for_zero_vector() {
        let v = vec![1.0, 2.0, 3.0];
        let zero = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
    }
}
