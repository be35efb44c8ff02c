pub mod health;
pub mod refactoring;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /refactoring                                     list, submit
/// /refactoring/languages                           supported languages
/// /refactoring/analyze                             advisory analysis
/// /refactoring/suggestions                         advisory suggestions
/// /refactoring/explain                             advisory explanation
/// /refactoring/{id}                                snapshot
/// /refactoring/{id}/feedback                       list, create
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/refactoring", refactoring::router())
}
