//! Feedback entry models and DTOs.

use refactorer_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `refactoring_feedback` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Feedback {
    pub id: RecordId,
    pub refactoring_id: RecordId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for `POST /api/v1/refactoring/{id}/feedback`.
///
/// A missing rating defaults to 0 and fails the range check.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeedback {
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}
