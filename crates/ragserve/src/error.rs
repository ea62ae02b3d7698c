//! Error types for the retrieval pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors, scoped to a single request. None of these is fatal to
/// the process.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input is empty or malformed
    #[error("validation error: {0}")]
    Validation(String),

    /// Embedding backend unreachable, non-success, or malformed response
    #[error("embedding backend error: {0}")]
    Embedding(String),

    /// Persistence or retrieval failure in the fragment store
    #[error("store error: {0}")]
    Store(String),

    /// Generation backend unreachable or malformed stream framing
    #[error("generation backend error: {0}")]
    Generation(String),

    /// A per-fragment indexing step failed; `index` is zero-based within the
    /// submitted document
    #[error("fragment {index}: {source}")]
    Fragment {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Wrap a per-fragment failure with the failing fragment's index
    pub fn at_fragment(index: usize, source: Error) -> Self {
        Self::Fragment {
            index,
            source: Box::new(source),
        }
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            Error::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::Fragment { source, .. } => source.status_and_type(),
        }
    }
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
