//! Error types for vokab-pr
//!
//! Failure taxonomy:
//! - InputRejected: malformed word or word type, caught before orchestration (400)
//! - NotFound: no dictionary entry, redirect, or no qualifying audio link (404)
//! - UpstreamFailure: unexpected status from the dictionary site (502)
//!
//! Cache inconsistency (metadata without blob) and persistence skew (blob
//! without metadata) are absorbed by the orchestrator and never reach here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Dictionary website errors
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Terminal orchestration failures
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Upstream failure: {0}")]
    Upstream(#[from] DictionaryError),

    #[error("Downloaded audio for '{0}' is empty")]
    EmptyPayload(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected word or word type (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No recording for the word and word type (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Dictionary site failure (502)
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Shutting down (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Store or configuration failure reaching a handler (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<vokab_common::Error> for ApiError {
    fn from(err: vokab_common::Error) -> Self {
        match err {
            vokab_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RecordingError> for ApiError {
    fn from(err: RecordingError) -> Self {
        match err {
            RecordingError::Upstream(e) => ApiError::Upstream(e.to_string()),
            RecordingError::EmptyPayload(word) => {
                ApiError::Upstream(format!("empty audio payload for '{}'", word))
            }
            RecordingError::Cancelled => ApiError::Unavailable("request cancelled".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILURE", msg),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (ApiError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                vokab_common::Error::InvalidInput("x".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                vokab_common::Error::CorruptRecord("x".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_rejection_keeps_validation_message() {
        let err: ApiError = vokab_common::Error::InvalidInput("unknown word type 'Noun'".into()).into();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "unknown word type 'Noun'"));
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err: ApiError = vokab_common::Error::Index(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_upstream_failure_maps_to_bad_gateway() {
        let err: ApiError = RecordingError::Upstream(DictionaryError::UnexpectedStatus {
            status: 503,
            url: "https://example.org/dictionary/english/apple".into(),
        })
        .into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
