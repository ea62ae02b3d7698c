//! Streaming answer generation

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaGenerator;
pub use prompt::build_prompt;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::Deserialize;

use crate::error::Result;

/// One decoded increment from the generation backend
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GenerationChunk {
    /// Partial answer text, possibly empty
    pub response: String,
    /// Completion flag: true on the terminal increment
    pub done: bool,
}

/// Stream of decoded generation increments
pub type GenerationStream = BoxStream<'static, Result<GenerationChunk>>;

/// Trait for a streaming generation backend.
///
/// `generate_stream` fails outright when the backend is unreachable or
/// rejects the request; framing errors mid-stream surface as `Err` items on
/// the returned stream.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Submit `prompt` and stream decoded increments back, one at a time
    async fn generate_stream(&self, prompt: &str) -> Result<GenerationStream>;
}
