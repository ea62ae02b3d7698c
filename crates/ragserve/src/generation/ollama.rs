//! Ollama streaming generation client

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::collections::VecDeque;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::{GenerationChunk, GenerationProvider, GenerationStream};

/// Generation client for the Ollama `/api/generate` endpoint.
///
/// The backend answers with NDJSON increments; network chunks may split a
/// line anywhere, so decoding buffers bytes until a full line is available
/// and emits exactly one `GenerationChunk` per line.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

impl OllamaGenerator {
    /// Create a new generator sharing `client` with the rest of the service
    pub fn new(client: Client, config: &LlmConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.generate_model.clone(),
        }
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerator {
    async fn generate_stream(&self, prompt: &str) -> Result<GenerationStream> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!("HTTP {status}: {body}")));
        }

        let state = DecodeState {
            inner: response.bytes_stream().boxed(),
            buf: Vec::new(),
            pending: VecDeque::new(),
        };

        let stream = futures_util::stream::try_unfold(state, |mut state| async move {
            loop {
                if let Some(chunk) = state.pending.pop_front() {
                    return Ok(Some((chunk, state)));
                }

                match state.inner.next().await {
                    Some(Ok(bytes)) => {
                        state.pending = decode_lines(&mut state.buf, &bytes)?.into();
                    }
                    Some(Err(e)) => {
                        return Err(Error::generation(format!("stream transport error: {e}")));
                    }
                    None => {
                        // a trailing increment may lack the final newline
                        if let Some(chunk) = flush_trailing(&mut state.buf)? {
                            return Ok(Some((chunk, state)));
                        }
                        return Ok(None);
                    }
                }
            }
        });

        Ok(stream.boxed())
    }
}

struct DecodeState {
    inner: futures_util::stream::BoxStream<'static, reqwest::Result<bytes::Bytes>>,
    buf: Vec<u8>,
    pending: VecDeque<GenerationChunk>,
}

/// Append `bytes` to `buf` and decode every complete NDJSON line
fn decode_lines(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<Vec<GenerationChunk>> {
    buf.extend_from_slice(bytes);

    let mut chunks = Vec::new();
    while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buf.drain(..=pos).collect();
        let line = &line[..line.len() - 1];
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let chunk: GenerationChunk = serde_json::from_slice(line)
            .map_err(|e| Error::generation(format!("malformed stream framing: {e}")))?;
        chunks.push(chunk);
    }

    Ok(chunks)
}

/// Decode whatever is left in `buf` once the transport closes
fn flush_trailing(buf: &mut Vec<u8>) -> Result<Option<GenerationChunk>> {
    if buf.iter().all(u8::is_ascii_whitespace) {
        buf.clear();
        return Ok(None);
    }
    let chunk: GenerationChunk = serde_json::from_slice(buf)
        .map_err(|e| Error::generation(format!("malformed stream framing: {e}")))?;
    buf.clear();
    Ok(Some(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_complete_lines() {
        let mut buf = Vec::new();
        let chunks = decode_lines(
            &mut buf,
            b"{\"response\":\"Go\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
        )
        .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].response, "Go");
        assert!(chunks[1].done);
        assert!(buf.is_empty());
    }

    #[test]
    fn buffers_lines_split_across_network_chunks() {
        let mut buf = Vec::new();
        let first = decode_lines(&mut buf, b"{\"response\":\"he").unwrap();
        assert!(first.is_empty());
        let second = decode_lines(&mut buf, b"llo\",\"done\":false}\n").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].response, "hello");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut buf = Vec::new();
        let chunks = decode_lines(&mut buf, b"\n\n{\"response\":\"x\",\"done\":false}\n\n").unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn malformed_line_is_a_generation_error() {
        let mut buf = Vec::new();
        let err = decode_lines(&mut buf, b"not json\n").unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn trailing_increment_without_newline_is_flushed() {
        let mut buf = Vec::new();
        decode_lines(&mut buf, b"{\"response\":\"end\",\"done\":true}").unwrap();
        let chunk = flush_trailing(&mut buf).unwrap().unwrap();
        assert_eq!(chunk.response, "end");
        assert!(chunk.done);
    }
}
