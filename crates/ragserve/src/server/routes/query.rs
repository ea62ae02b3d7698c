//! Query endpoint: SSE stream of answer tokens

use std::convert::Infallible;

use axum::{
    extract::{Query as QueryParams, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use crate::engine::AnswerEvent;
use crate::error::Result;
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub q: String,
    /// Optional top-k override, clamped to the configured maximum
    pub k: Option<usize>,
}

/// GET /api/query — embed the question, retrieve context, and stream the
/// generated answer: one `data:` frame per token, then `event: done`.
/// Mid-stream generation failures arrive as `event: error` and terminate the
/// stream; failures before the stream opens map to plain HTTP errors.
pub async fn query(
    State(state): State<AppState>,
    QueryParams(request): QueryParams<QueryRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let retrieval = &state.config().retrieval;
    let top_k = request
        .k
        .unwrap_or(retrieval.default_top_k)
        .clamp(1, retrieval.max_top_k);

    tracing::info!(question = %request.q, top_k, "query received");
    let answer = state.engine().answer(&request.q, top_k).await?;

    let events = answer.map(|event| {
        Ok(match event {
            AnswerEvent::Token(token) => Event::default().data(token.replace('\n', "\\n")),
            AnswerEvent::Done => Event::default().event("done").data("done"),
            AnswerEvent::Error(message) => {
                Event::default().event("error").data(message.replace('\n', " "))
            }
        })
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
