//! Error taxonomy for the retrieval and generation pipeline.
//!
//! The split mirrors the recovery policy: retrieval-layer errors are
//! absorbed and degraded wherever a safe fallback exists, assembly never
//! fails, and only configuration errors and the final generation call are
//! surfaced to the caller.

use thiserror::Error;

/// Errors raised by chunk-store queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// The query embedding's dimensionality does not match the corpus.
    ///
    /// This is a configuration/data error, not a transient fault, and must
    /// never be retried.
    #[error("embedding dimension mismatch: query has {query} dims, store has {store}")]
    DimensionMismatch { query: usize, store: usize },

    /// The backing store could not be queried.
    #[error("chunk store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Top-level pipeline errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing credentials, bad dimensions, unknown provider. Fatal,
    /// surfaced immediately, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The embedding provider failed (quota, network, timeout). Recoverable:
    /// callers degrade to keyword-only retrieval and continue.
    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The generation model failed or timed out. User-visible; there is no
    /// local recovery since the generated text is the end product.
    #[error("generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
