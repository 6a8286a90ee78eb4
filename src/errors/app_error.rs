use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::artifacts::pitch::PitchError;
use crate::core::artifacts::store::ArtifactError;
use crate::core::presets::PresetError;

/// Application-wide error type returned by HTTP handlers.
///
/// Every variant maps to a status code and a JSON body of the form
/// `{ "error": <message>, "status": <code> }`. Internal failures keep
/// their detail in the server log and return a generic message.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or out-of-range request input (400).
    Validation(String),
    /// Request text exceeds the accepted length (413).
    PayloadTooLarge(String),
    /// Caller exceeded the per-endpoint request budget (429).
    RateLimited,
    /// Requested resource does not exist (404).
    NotFound(String),
    /// Artifact exists but its format is not servable (415).
    UnsupportedMedia(String),
    /// A speech provider request failed; the upstream status is preserved.
    Upstream { status: u16, message: String },
    /// Synthesis did not complete within the configured deadline (500).
    Timeout(String),
    /// Unexpected internal failure (500); detail is logged, not returned.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, msg)
            }
            AppError::RateLimited => {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Too many requests, please try again later".to_string(),
                )
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::UnsupportedMedia(msg) => {
                tracing::warn!("Unsupported media: {}", msg);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg)
            }
            AppError::Upstream { status, message } => {
                tracing::error!("Upstream provider error ({}): {}", status, message);
                let status = StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message)
            }
            AppError::Timeout(msg) => {
                tracing::error!("Synthesis timeout: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, please try again later".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "validation error: {msg}"),
            AppError::PayloadTooLarge(msg) => write!(f, "payload too large: {msg}"),
            AppError::RateLimited => write!(f, "rate limit exceeded"),
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::UnsupportedMedia(msg) => write!(f, "unsupported media: {msg}"),
            AppError::Upstream { status, message } => {
                write!(f, "upstream error ({status}): {message}")
            }
            AppError::Timeout(msg) => write!(f, "timeout: {msg}"),
            AppError::Internal(detail) => write!(f, "internal error: {detail}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound => {
                AppError::NotFound("Audio file not found or already cleaned up".to_string())
            }
            ArtifactError::UnsupportedExtension => {
                AppError::UnsupportedMedia("Unsupported audio format".to_string())
            }
            ArtifactError::Io(e) => AppError::Internal(format!("audio storage error: {e}")),
        }
    }
}

impl From<PresetError> for AppError {
    fn from(err: PresetError) -> Self {
        match err {
            PresetError::EmptyName => {
                AppError::Validation("Preset name cannot be empty".to_string())
            }
            PresetError::NotFound => AppError::NotFound("Preset not found".to_string()),
            PresetError::Io(e) => AppError::Internal(format!("preset storage error: {e}")),
            PresetError::Serialization(e) => {
                AppError::Internal(format!("preset serialization error: {e}"))
            }
        }
    }
}

impl From<PitchError> for AppError {
    fn from(err: PitchError) -> Self {
        AppError::Internal(format!("pitch processing error: {err}"))
    }
}

/// Convenience result alias for handler functions.
pub type AppResult<T> = Result<T, AppError>;
