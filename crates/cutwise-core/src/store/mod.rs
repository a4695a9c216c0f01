//! Storage abstraction for the reference-chunk corpus.
//!
//! The [`ChunkStore`] trait defines the two read-only query operations the
//! retrieval pipeline needs, enabling pluggable backends (in-memory, future
//! remote stores). The corpus is written by an offline ingestion process;
//! nothing in this subsystem mutates it, so implementations need no
//! interior locking beyond what their construction requires.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::RetrievalError;
use crate::models::ScoredResult;

/// Read-only query interface over the chunk corpus.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`vector_query`](ChunkStore::vector_query) | Cosine-similarity search over stored embeddings |
/// | [`keyword_query`](ChunkStore::keyword_query) | Lexical token-match search over text and tags |
/// | [`chunk_count`](ChunkStore::chunk_count) | Corpus size, for stats and health output |
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Nearest-neighbor search by cosine similarity.
    ///
    /// Returns results with similarity ≥ `threshold`, ordered by similarity
    /// descending with ties broken by chunk id ascending, truncated to
    /// `limit`. An empty corpus yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// [`RetrievalError::DimensionMismatch`] when the query vector's length
    /// differs from the corpus dimensionality.
    async fn vector_query(
        &self,
        query: &[f32],
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, RetrievalError>;

    /// Lexical search scoring each chunk by how many *distinct* query
    /// tokens appear as substrings of its text fields, title, and keyword
    /// tags (case-insensitive).
    ///
    /// Chunks with zero matches are excluded. Results are ordered by score
    /// descending with ties broken by chunk id ascending, truncated to
    /// `limit`.
    async fn keyword_query(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredResult>, RetrievalError>;

    /// Number of chunks in the corpus.
    async fn chunk_count(&self) -> Result<usize, RetrievalError>;
}
