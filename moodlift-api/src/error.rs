//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moodlift_db::StoreError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("Content already unlocked")]
    AlreadyUnlocked,

    #[error("Not enough points")]
    InsufficientPoints { required: i64, balance: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::AlreadyExists(msg) => ApiError::Conflict(msg),
            StoreError::AlreadyCheckedIn => ApiError::AlreadyCheckedIn,
            StoreError::InsufficientPoints { required, balance } => {
                ApiError::InsufficientPoints { required, balance }
            }
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::Query(msg) => ApiError::Internal(msg),
            StoreError::Serialization(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            ApiError::AlreadyCheckedIn => (
                StatusCode::BAD_REQUEST,
                "ALREADY_CHECKED_IN",
                "Already checked in today".to_string(),
                None,
            ),
            ApiError::AlreadyUnlocked => (
                StatusCode::BAD_REQUEST,
                "ALREADY_UNLOCKED",
                "Content already unlocked".to_string(),
                None,
            ),
            ApiError::InsufficientPoints { required, balance } => (
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_POINTS",
                "Not enough points".to_string(),
                Some(json!({ "required": required, "balance": balance })),
            ),
            ApiError::Internal(msg) => {
                // Full detail always lands in the server log; the body is
                // redacted outside debug builds.
                tracing::error!("Internal error: {msg}");
                let body = if cfg!(debug_assertions) {
                    msg.clone()
                } else {
                    "Internal server error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", body, None)
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
