use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coursehub_core::error::CoreError;
use coursehub_store::{RepositoryError, StoreError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for store
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `coursehub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by a store adapter.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Input(core) => Self::Core(core),
            RepositoryError::Store(store) => Self::Store(store),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store failure into an HTTP status, error code, and message.
///
/// Backend failures are logged and reported with a sanitized message; the
/// rest carry the store's own human-readable text.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::Rejected(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        StoreError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
        }
        StoreError::PermissionDenied(_) => {
            tracing::warn!(error = %err, "Store permission denied");
            (StatusCode::FORBIDDEN, "STORE_PERMISSION_DENIED", err.to_string())
        }
        StoreError::Unavailable(_) => {
            tracing::error!(error = %err, "Store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Store operation failed: service unavailable".to_string(),
            )
        }
        StoreError::Backend(_) => {
            tracing::error!(error = %err, "Store backend error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
