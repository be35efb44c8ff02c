//! Repository for the `refactoring_feedback` table.

use refactorer_core::types::RecordId;
use sqlx::PgPool;

use crate::models::feedback::{CreateFeedback, Feedback};

/// Column list for `refactoring_feedback` queries.
const COLUMNS: &str = "id, refactoring_id, rating, comment, created_at";

/// Provides create/list operations for feedback entries.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a feedback entry if the parent record exists.
    ///
    /// The existence check and the insert are one statement; `None` means
    /// the parent refactoring does not exist.
    pub async fn create(
        pool: &PgPool,
        id: RecordId,
        refactoring_id: RecordId,
        input: &CreateFeedback,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!(
            "INSERT INTO refactoring_feedback (id, refactoring_id, rating, comment) \
             SELECT $1, $2, $3, $4 \
             WHERE EXISTS (SELECT 1 FROM code_refactorings WHERE id = $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .bind(refactoring_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_optional(pool)
            .await
    }

    /// All feedback for the given records, oldest first.
    pub async fn list_for_refactorings(
        pool: &PgPool,
        refactoring_ids: &[RecordId],
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM refactoring_feedback \
             WHERE refactoring_id = ANY($1) \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(refactoring_ids)
            .fetch_all(pool)
            .await
    }
}
