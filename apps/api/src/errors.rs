use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("The acting user changed while the request was running")]
    UserChanged,

    #[error("Completion of '{0}' was not saved")]
    CompletionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Your data could not be saved or loaded. Please try again.".to_string(),
                )
            }
            AppError::UserChanged => (
                StatusCode::CONFLICT,
                "SESSION_CHANGED",
                "The signed-in user changed. Reload and try again.".to_string(),
            ),
            AppError::CompletionFailed(title) => {
                tracing::error!("Completion failed: {title}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "COMPLETION_FAILED",
                    format!("'{title}' could not be marked complete. Please try again."),
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

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Store(e) => AppError::Store(e),
            SessionError::UserChanged => AppError::UserChanged,
            SessionError::Pass(e) => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}
