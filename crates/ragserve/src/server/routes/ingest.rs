//! Document indexing endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Source tag recorded for text submitted inline rather than as a file
const INLINE_TEXT_SOURCE: &str = "user_text";

#[derive(Serialize)]
pub struct IngestResponse {
    pub ok: bool,
    /// Number of fragments persisted for this document
    pub fragments: usize,
}

/// POST /api/ingest — multipart form with an optional `text` field and/or a
/// `.txt` file part. The file wins when both are present; `source` is the
/// filename or the inline-text sentinel.
pub async fn ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let mut text = String::new();
    let mut file: Option<(String, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("error parsing form: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => {
                text = field
                    .text()
                    .await
                    .map_err(|e| Error::validation(format!("error reading text field: {e}")))?;
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if !filename.to_lowercase().ends_with(".txt") {
                    return Err(Error::validation("only .txt files are accepted"));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("error reading file: {e}")))?;
                file = Some((filename, String::from_utf8_lossy(&data).into_owned()));
            }
            _ => {}
        }
    }

    let (content, source) = match file {
        Some((filename, content)) if !content.is_empty() => (content, filename),
        _ => (text, INLINE_TEXT_SOURCE.to_string()),
    };

    tracing::info!(%source, len = content.len(), "indexing new content");
    let fragments = state.engine().index(&content, &source).await?;

    Ok(Json(IngestResponse {
        ok: true,
        fragments,
    }))
}
