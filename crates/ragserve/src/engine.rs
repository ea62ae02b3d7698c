//! Retrieval orchestration: indexing documents and answering questions

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::collections::VecDeque;

use crate::chunking::chunk;
use crate::config::ChunkingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::generation::{build_prompt, GenerationProvider, GenerationStream};
use crate::store::FragmentStore;

/// One event on an answer stream.
///
/// A stream yields zero or more `Token`s followed by at most one terminal
/// `Done` or `Error`; there is no resumption after either.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerEvent {
    /// Non-empty partial answer text
    Token(String),
    /// The backend signalled completion
    Done,
    /// The stream broke mid-generation; terminal
    Error(String),
}

/// Stream of answer events forwarded to the caller
pub type AnswerStream = BoxStream<'static, AnswerEvent>;

/// Composes the chunker, embedder, fragment store, and generation backend.
///
/// Providers are injected at construction so tests can swap in doubles; the
/// engine holds no mutable state of its own.
pub struct RagEngine<E, S, G> {
    embedder: E,
    store: S,
    generator: G,
    chunking: ChunkingConfig,
}

impl<E, S, G> RagEngine<E, S, G>
where
    E: EmbeddingProvider,
    S: FragmentStore,
    G: GenerationProvider,
{
    pub fn new(embedder: E, store: S, generator: G, chunking: ChunkingConfig) -> Self {
        Self {
            embedder,
            store,
            generator,
            chunking,
        }
    }

    /// Chunk `content`, then embed and insert each fragment in order.
    ///
    /// Strictly sequential: the first failing fragment aborts the operation
    /// and its zero-based index is carried on the error. Fragments already
    /// inserted stay in the store; there is no rollback. Returns the number
    /// of fragments persisted on full success.
    pub async fn index(&self, content: &str, source: &str) -> Result<usize> {
        if content.trim().is_empty() {
            return Err(Error::validation("no text or file provided"));
        }

        let fragments = chunk(content, self.chunking.chunk_size, self.chunking.chunk_overlap);
        for (i, fragment) in fragments.iter().enumerate() {
            let vector = self
                .embedder
                .embed(fragment)
                .await
                .map_err(|e| Error::at_fragment(i, e))?;
            self.store
                .insert(fragment, source, &vector)
                .await
                .map_err(|e| Error::at_fragment(i, e))?;
        }

        tracing::info!(source, fragments = fragments.len(), "document indexed");
        Ok(fragments.len())
    }

    /// Embed `question`, retrieve the `top_k` nearest fragments, and stream
    /// the grounded answer back as [`AnswerEvent`]s.
    ///
    /// Zero retrieved fragments is not an error: generation proceeds with an
    /// empty context. Failures before the stream opens are returned as `Err`;
    /// failures mid-stream arrive as a terminal [`AnswerEvent::Error`].
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<AnswerStream> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::validation("question is empty"));
        }

        let query_vector = self.embedder.embed(question).await?;
        let fragments = self.store.search(&query_vector, top_k).await?;
        tracing::debug!(top_k, retrieved = fragments.len(), "context retrieved");

        let prompt = build_prompt(question, &fragments);
        let stream = self.generator.generate_stream(&prompt).await?;
        Ok(relay(stream))
    }
}

struct RelayState {
    inner: Option<GenerationStream>,
    queued: VecDeque<AnswerEvent>,
}

/// Forward generation increments one at a time: each non-empty partial text
/// becomes a `Token`, the first done-flagged increment becomes `Done`, and a
/// decode or transport failure becomes a terminal `Error`. No buffering
/// beyond the increment in flight, no reordering.
fn relay(stream: GenerationStream) -> AnswerStream {
    let state = RelayState {
        inner: Some(stream),
        queued: VecDeque::new(),
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.queued.pop_front() {
                return Some((event, state));
            }

            let inner = state.inner.as_mut()?;
            match inner.next().await {
                Some(Ok(chunk)) => {
                    if !chunk.response.is_empty() {
                        state.queued.push_back(AnswerEvent::Token(chunk.response));
                    }
                    if chunk.done {
                        state.queued.push_back(AnswerEvent::Done);
                        state.inner = None;
                    }
                }
                Some(Err(e)) => {
                    state.queued.push_back(AnswerEvent::Error(e.to_string()));
                    state.inner = None;
                }
                // backend closed without a completion flag: end quietly
                None => {
                    state.inner = None;
                }
            }
        }
    })
    .boxed()
}
