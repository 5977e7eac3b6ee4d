//! Unified error handling for the server.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] fleet_engine::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "server error".to_string())
            }
            // Unknown roles answer 404, as the browser UI expects.
            AppError::Engine(e @ fleet_engine::Error::InvalidRole(_)) => {
                tracing::warn!("Rejected: {}", e);
                (StatusCode::NOT_FOUND, e.to_string())
            }
            AppError::Engine(e) if e.is_validation() => {
                tracing::warn!("Rejected: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Engine(e) => {
                tracing::debug!("Lookup failed: {}", e);
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "server error".to_string())
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// An id that does not parse cannot name an existing record.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
