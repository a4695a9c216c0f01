//! In-memory [`ChunkStore`] over a pre-loaded corpus.
//!
//! Vector search is brute-force cosine similarity over all stored
//! embeddings; keyword search scans the concatenated text fields. The
//! corpus is immutable after construction, so queries borrow it without
//! locking.

use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::error::RetrievalError;
use crate::models::{Chunk, ScoredResult};

use super::ChunkStore;

/// Brute-force in-memory store backing the JSON corpus and tests.
#[derive(Debug)]
pub struct MemoryStore {
    chunks: Vec<Chunk>,
}

impl MemoryStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Corpus embedding dimensionality, or `None` for an empty corpus.
    pub fn dims(&self) -> Option<usize> {
        self.chunks.first().map(|c| c.embedding.len())
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Lowercased haystack a chunk exposes to keyword matching: text,
    /// localized text, title, and keyword tags.
    fn haystack(chunk: &Chunk) -> String {
        let mut s = String::with_capacity(chunk.text.len() + 64);
        s.push_str(&chunk.text);
        if let Some(ko) = &chunk.text_ko {
            s.push(' ');
            s.push_str(ko);
        }
        if let Some(title) = &chunk.title {
            s.push(' ');
            s.push_str(title);
        }
        for kw in &chunk.keywords {
            s.push(' ');
            s.push_str(kw);
        }
        s.to_lowercase()
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn vector_query(
        &self,
        query: &[f32],
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, RetrievalError> {
        let Some(dims) = self.dims() else {
            return Ok(Vec::new());
        };
        if query.len() != dims {
            return Err(RetrievalError::DimensionMismatch {
                query: query.len(),
                store: dims,
            });
        }

        let mut results: Vec<ScoredResult> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let sim = cosine_similarity(query, &chunk.embedding);
                if sim >= threshold {
                    Some(ScoredResult::from_vector(chunk.clone(), sim))
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn keyword_query(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredResult>, RetrievalError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<ScoredResult> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let haystack = Self::haystack(chunk);
                let matches = tokens
                    .iter()
                    .filter(|t| haystack.contains(t.as_str()))
                    .count() as u32;
                if matches > 0 {
                    Some(ScoredResult::from_keyword(chunk.clone(), matches))
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.keyword_matches
                .cmp(&a.keyword_matches)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn chunk_count(&self) -> Result<usize, RetrievalError> {
        Ok(self.chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tokenize_query;

    fn chunk(id: &str, embedding: Vec<f32>, keywords: &[&str]) -> Chunk {
        Chunk {
            id: id.to_string(),
            title: None,
            text: format!("reference text for {id}"),
            text_ko: None,
            embedding,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            category: None,
            importance: 1,
        }
    }

    #[tokio::test]
    async fn test_vector_query_respects_threshold_and_order() {
        // Unit vectors at fixed angles: similarities to the query axis are
        // approximately 0.92, 0.81, 0.40.
        let query = vec![1.0, 0.0];
        let angled = |cos: f32| vec![cos, (1.0 - cos * cos).sqrt()];
        let store = MemoryStore::new(vec![
            chunk("c-mid", angled(0.81), &[]),
            chunk("c-top", angled(0.92), &[]),
            chunk("c-low", angled(0.40), &[]),
        ]);

        let results = store.vector_query(&query, 0.5, 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "c-top");
        assert_eq!(results[1].chunk.id, "c-mid");
        for r in &results {
            assert!(r.similarity.unwrap() >= 0.5);
        }
    }

    #[tokio::test]
    async fn test_vector_query_empty_store() {
        let store = MemoryStore::new(Vec::new());
        let results = store.vector_query(&[1.0, 0.0], 0.5, 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_vector_query_dimension_mismatch() {
        let store = MemoryStore::new(vec![chunk("c1", vec![1.0, 0.0, 0.0], &[])]);
        let err = store.vector_query(&[1.0, 0.0], 0.5, 10).await.unwrap_err();
        assert_eq!(err, RetrievalError::DimensionMismatch { query: 2, store: 3 });
    }

    #[tokio::test]
    async fn test_vector_query_tie_break_by_id() {
        let store = MemoryStore::new(vec![
            chunk("b", vec![1.0, 0.0], &[]),
            chunk("a", vec![1.0, 0.0], &[]),
        ]);
        let results = store.vector_query(&[1.0, 0.0], 0.0, 10).await.unwrap();
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[1].chunk.id, "b");
    }

    #[tokio::test]
    async fn test_keyword_query_counts_distinct_tokens() {
        let store = MemoryStore::new(vec![
            chunk("a", vec![0.0], &["volume", "crown"]),
            chunk("b", vec![0.0], &["layer"]),
            chunk("c", vec![0.0], &["fade"]),
        ]);
        let tokens = tokenize_query("volume crown layer");
        let results = store.keyword_query(&tokens, 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[0].keyword_matches, Some(2));
        assert_eq!(results[1].chunk.id, "b");
        assert_eq!(results[1].keyword_matches, Some(1));
    }

    #[tokio::test]
    async fn test_keyword_query_idempotent() {
        let store = MemoryStore::new(vec![
            chunk("a", vec![0.0], &["volume", "crown"]),
            chunk("b", vec![0.0], &["volume"]),
        ]);
        let tokens = tokenize_query("volume crown");
        let first = store.keyword_query(&tokens, 10).await.unwrap();
        let second = store.keyword_query(&tokens, 10).await.unwrap();
        let ids = |rs: &[ScoredResult]| rs.iter().map(|r| r.chunk.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn test_keyword_query_matches_localized_text_and_title() {
        let mut c = chunk("a", vec![0.0], &[]);
        c.text_ko = Some("그래쥬에이션 기법".to_string());
        c.title = Some("Crown shaping".to_string());
        let store = MemoryStore::new(vec![c]);

        let results = store
            .keyword_query(&tokenize_query("crown 그래쥬에이션"), 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].keyword_matches, Some(2));
    }
}
