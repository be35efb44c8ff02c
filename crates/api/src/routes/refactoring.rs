//! Route definitions for refactoring requests, feedback, and the advisory
//! endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{advisory, refactoring};
use crate::state::AppState;

/// Routes mounted at `/refactoring`.
///
/// ```text
/// GET    /                  -> list_refactorings
/// POST   /                  -> create_refactoring
/// GET    /languages         -> list_languages
/// POST   /analyze           -> analyze
/// POST   /suggestions       -> suggestions
/// POST   /explain           -> explain
/// GET    /{id}              -> get_refactoring
/// GET    /{id}/feedback     -> list_feedback
/// POST   /{id}/feedback     -> create_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(refactoring::list_refactorings).post(refactoring::create_refactoring),
        )
        .route("/languages", get(advisory::list_languages))
        .route("/analyze", post(advisory::analyze))
        .route("/suggestions", post(advisory::suggestions))
        .route("/explain", post(advisory::explain))
        .route("/{id}", get(refactoring::get_refactoring))
        .route(
            "/{id}/feedback",
            get(refactoring::list_feedback).post(refactoring::create_feedback),
        )
}
