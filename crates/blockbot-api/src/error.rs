//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping internal errors to appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use blockbot_chat::ChatError;
use blockbot_core::error::BlockbotError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "conflict").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - invalid body, overlong message, unknown topic.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 409 Conflict - a previous turn is still being answered.
    #[error("conflict: {0}")]
    Conflict(String),
    /// 500 Internal Server Error - unexpected server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Busy => ApiError::Conflict(err.to_string()),
            ChatError::MessageTooLong(_) | ChatError::UnknownTopic(_) => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<BlockbotError> for ApiError {
    fn from(err: BlockbotError) -> Self {
        match &err {
            BlockbotError::Config(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_maps_to_conflict() {
        let resp = ApiError::from(ChatError::Busy).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_too_long_maps_to_bad_request() {
        let resp = ApiError::from(ChatError::MessageTooLong(10)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_topic_maps_to_bad_request() {
        let err = ApiError::from(ChatError::UnknownTopic("Gardening".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("Gardening")));
    }

    #[test]
    fn test_io_error_maps_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ApiError::from(BlockbotError::Io(io));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
