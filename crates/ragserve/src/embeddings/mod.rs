//! Embedding provider abstraction

pub mod ollama;

pub use ollama::OllamaEmbedder;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for turning text into a fixed-dimension embedding vector.
///
/// One network call per invocation, no retry: a failed call aborts the
/// enclosing operation. Implementations hold no mutable shared state beyond
/// their network client, so they are safe to call from concurrent requests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimensions (768 for nomic-embed-text)
    fn dimensions(&self) -> usize;
}
