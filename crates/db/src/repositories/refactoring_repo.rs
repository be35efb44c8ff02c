//! Repository for the `code_refactorings` table.
//!
//! Uses `RefactoringStatus` from `models::status` for every status literal.

use refactorer_core::types::RecordId;
use sqlx::PgPool;

use crate::models::refactoring::{NewRefactoring, Refactoring, TerminalUpdate};
use crate::models::status::RefactoringStatus;

/// Column list for `code_refactorings` queries.
const COLUMNS: &str = "\
    id, original_code, language, focus_areas, status_id, \
    refactored_code, explanation, analysis_result, \
    created_at, updated_at";

/// Provides CRUD operations for refactoring records.
pub struct RefactoringRepo;

impl RefactoringRepo {
    /// Insert a new record in `processing` status.
    pub async fn create(pool: &PgPool, input: &NewRefactoring) -> Result<Refactoring, sqlx::Error> {
        let query = format!(
            "INSERT INTO code_refactorings (id, original_code, language, focus_areas, status_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Refactoring>(&query)
            .bind(input.id)
            .bind(&input.original_code)
            .bind(&input.language)
            .bind(&input.focus_areas)
            .bind(RefactoringStatus::Processing.id())
            .fetch_one(pool)
            .await
    }

    /// Find a record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: RecordId) -> Result<Option<Refactoring>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM code_refactorings WHERE id = $1");
        sqlx::query_as::<_, Refactoring>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records in creation order.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Refactoring>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM code_refactorings \
             ORDER BY created_at ASC, id ASC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Refactoring>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply the terminal update in one statement.
    ///
    /// Only a record still in `processing` is touched, so terminal records
    /// are never rewritten. Returns `true` if a row was updated, `false` if
    /// the record is missing or already terminal. `updated_at` is refreshed
    /// by the table trigger.
    pub async fn finish(
        pool: &PgPool,
        id: RecordId,
        update: &TerminalUpdate,
    ) -> Result<bool, sqlx::Error> {
        let (refactored_code, explanation, analysis_result) = update.columns();
        let result = sqlx::query(
            "UPDATE code_refactorings \
             SET status_id = $2, refactored_code = $3, explanation = $4, analysis_result = $5 \
             WHERE id = $1 AND status_id = $6",
        )
        .bind(id)
        .bind(update.status().id())
        .bind(refactored_code)
        .bind(explanation)
        .bind(analysis_result)
        .bind(RefactoringStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
