//! ragserve: retrieval-augmented answering service
//!
//! Splits submitted text into overlapping fragments, embeds them through an
//! external embedding backend, persists the vectors in Postgres/pgvector, and
//! answers questions by similarity search plus a streamed, grounded
//! generation pass.

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod generation;
pub mod server;
pub mod store;

pub use chunking::chunk;
pub use config::RagConfig;
pub use embeddings::{EmbeddingProvider, OllamaEmbedder};
pub use engine::{AnswerEvent, AnswerStream, RagEngine};
pub use error::{Error, Result};
pub use generation::{GenerationChunk, GenerationProvider, OllamaGenerator};
pub use store::{Fragment, FragmentStore, PostgresFragmentStore};
