//! Handlers for refactoring requests and their feedback.
//!
//! All work is delegated to the [`LifecycleController`]; these functions
//! only extract, parse path ids, and wrap results in [`DataResponse`].
//!
//! [`LifecycleController`]: crate::engine::LifecycleController

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use refactorer_core::types::RecordId;
use refactorer_db::models::feedback::CreateFeedback;
use refactorer_db::models::refactoring::{RefactoringListQuery, SubmitRefactoring};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Ids that are not UUIDs cannot name an existing record, so they are
/// reported as not found rather than as malformed.
fn parse_id(raw: &str) -> AppResult<RecordId> {
    raw.parse::<RecordId>()
        .map_err(|_| AppError::UnknownId(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Refactoring requests
// ---------------------------------------------------------------------------

/// POST /api/v1/refactoring
///
/// Persist a new request in `processing` and schedule its background unit.
/// Responds immediately with the initial snapshot.
pub async fn create_refactoring(
    State(state): State<AppState>,
    Json(input): Json<SubmitRefactoring>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.lifecycle.submit(input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /api/v1/refactoring?skip=&limit=
pub async fn list_refactorings(
    State(state): State<AppState>,
    Query(params): Query<RefactoringListQuery>,
) -> AppResult<impl IntoResponse> {
    let snapshots = state.lifecycle.list(&params).await?;

    Ok(Json(DataResponse { data: snapshots }))
}

/// GET /api/v1/refactoring/{id}
///
/// Current snapshot in any status. Clients poll this until `status` is
/// `completed` or `failed`.
pub async fn get_refactoring(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let snapshot = state.lifecycle.get(id).await?;

    Ok(Json(DataResponse { data: snapshot }))
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// POST /api/v1/refactoring/{id}/feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let entry = state.lifecycle.add_feedback(id, input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/refactoring/{id}/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let entries = state.lifecycle.feedback(id).await?;

    Ok(Json(DataResponse { data: entries }))
}
