//! Pronunciation recording endpoint
//!
//! `GET /recordings/:word?wordType=<noun|verb|adjective|adverb>`
//!
//! Validation runs here, before the orchestrator: overlong words, unknown
//! word types and words with nothing left after sanitization are rejected
//! with 400.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use vokab_common::word::validate_request;

use crate::error::{ApiError, ApiResult};
use crate::services::RecordingOutcome;
use crate::types::AudioPayload;
use crate::AppState;

/// Response header naming where the recording came from (`cache` or `dictionary`)
pub const RECORDING_SOURCE_HEADER: &str = "x-recording-source";

/// Query parameters for a recording request
#[derive(Debug, Deserialize)]
pub struct RecordingQuery {
    #[serde(rename = "wordType")]
    pub word_type: Option<String>,
}

/// GET /recordings/:word
pub async fn get_recording(
    State(state): State<AppState>,
    Path(raw_word): Path<String>,
    Query(query): Query<RecordingQuery>,
) -> ApiResult<Response> {
    let (word, mut word_type) = validate_request(&raw_word, query.word_type.as_deref())?;

    if query.word_type.is_none() {
        word_type = state.classifier.classify(&word).await;
        tracing::debug!(word = %word, word_type = %word_type, "Classified word");
    }

    let cancel = state.shutdown.child_token();
    match state
        .orchestrator
        .get_recording(&word, word_type, &cancel)
        .await?
    {
        RecordingOutcome::Found { payload, source } => {
            let headers = [
                (header::CONTENT_TYPE, payload.content_type().to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&raw_word)),
                (
                    HeaderName::from_static(RECORDING_SOURCE_HEADER),
                    source.as_str().to_string(),
                ),
            ];
            Ok((headers, payload.bytes).into_response())
        }
        RecordingOutcome::NotFound(reason) => Err(ApiError::NotFound(format!(
            "No recording for '{}' ({}): {}",
            word,
            word_type,
            reason.describe()
        ))),
    }
}

/// `attachment` disposition suggesting `{original_word}.mp3`.
///
/// `filename` carries a quoted ASCII fallback; `filename*` carries the exact
/// name, UTF-8 percent-encoded (RFC 6266).
pub fn content_disposition(original_word: &str) -> String {
    let file_name = AudioPayload::file_name(original_word);
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(&file_name)
    )
}

/// Build recording routes
pub fn recording_routes() -> Router<AppState> {
    Router::new().route("/recordings/:word", get(get_recording))
}
