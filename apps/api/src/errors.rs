#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("No unused comments available for idea generation")]
    NoUnusedComments,

    #[error("Engine submission failed: {0}")]
    EngineSubmission(String),

    #[error("Engine status check failed: {0}")]
    EngineStatus(String),

    #[error("Malformed engine result: {0}")]
    MalformedResult(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::NoUnusedComments => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_UNUSED_COMMENTS",
                "No unused comments found to generate ideas".to_string(),
            ),
            AppError::EngineSubmission(msg) => {
                tracing::error!("Engine submission error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ENGINE_SUBMISSION_FAILED",
                    "Failed to submit the generation job".to_string(),
                )
            }
            AppError::EngineStatus(msg) => {
                tracing::error!("Engine status error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ENGINE_STATUS_FAILED",
                    "Failed to check the generation job status".to_string(),
                )
            }
            AppError::MalformedResult(msg) => {
                tracing::error!("Malformed engine result: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESULT",
                    "The generation job returned an unreadable result".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_no_unused_comments_maps_to_422() {
        let response = AppError::NoUnusedComments.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_engine_errors_map_to_bad_gateway() {
        for err in [
            AppError::EngineSubmission("boom".to_string()),
            AppError::EngineStatus("boom".to_string()),
            AppError::MalformedResult("boom".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
        }
    }
}
