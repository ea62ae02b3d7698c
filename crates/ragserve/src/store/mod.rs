//! Fragment persistence and similarity search

pub mod postgres;

pub use postgres::PostgresFragmentStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// One stored chunk of source text, retrieved by vector distance.
///
/// Fragments are immutable once stored: there is no update operation, only
/// insert and read.
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    /// Store-assigned id, stable for the record's lifetime
    pub id: i64,
    /// Non-empty text produced by the chunker
    pub content: String,
    /// Originating document: a filename or the inline-text sentinel
    pub source: String,
    /// Cosine distance to the query vector (smaller = more similar)
    pub distance: f64,
}

/// Trait for durable fragment storage with distance-ranked retrieval
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Append one fragment with its embedding vector
    async fn insert(&self, content: &str, source: &str, vector: &[f32]) -> Result<()>;

    /// Return up to `top_k` fragments in ascending cosine-distance order
    /// against `query_vector`. `top_k == 0` returns an empty list. The result
    /// is either fully populated or an error, never truncated mid-scan.
    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<Fragment>>;
}
