use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use refactorer_core::error::CoreError;
use refactorer_db::store::StoreError;
use refactorer_intelligence::BackendError;
use serde_json::json;

use crate::engine::LifecycleError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds persistence, backend, and
/// path-id variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `refactorer_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A synchronous code intelligence call failed (advisory endpoints).
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A path id that is not a valid record id.
    #[error("Unknown id: {0}")]
    UnknownId(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Core(e) => AppError::Core(e),
            LifecycleError::Store(e) => AppError::Store(e),
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
            },

            // --- Store errors ---
            AppError::Store(err) => match err {
                StoreError::NotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Refactoring with id {id} not found"),
                ),
                StoreError::Duplicate(id) => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Refactoring with id {id} already exists"),
                ),
                StoreError::Database(db) => classify_sqlx_error(db),
            },

            // --- Backend errors ---
            AppError::Backend(err) => {
                tracing::warn!(error = %err, "Code intelligence backend call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "BACKEND_ERROR",
                    "The code intelligence backend failed to process the request".to_string(),
                )
            }

            // --- Path ids ---
            AppError::UnknownId(raw) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Refactoring with id {raw} not found"),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
