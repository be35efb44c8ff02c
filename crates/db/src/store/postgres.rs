use async_trait::async_trait;
use refactorer_core::types::RecordId;

use crate::models::feedback::{CreateFeedback, Feedback};
use crate::models::refactoring::{NewRefactoring, Refactoring, TerminalUpdate};
use crate::repositories::{FeedbackRepo, RefactoringRepo};
use crate::DbPool;

use super::{RefactoringStore, StoreError, StoreResult};

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// [`RefactoringStore`] backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for migrations and diagnostics.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RefactoringStore for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, input: &NewRefactoring) -> StoreResult<Refactoring> {
        RefactoringRepo::create(&self.pool, input)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(input.id)
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Refactoring>> {
        Ok(RefactoringRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Refactoring>> {
        Ok(RefactoringRepo::list(&self.pool, limit, offset).await?)
    }

    async fn update(&self, id: RecordId, update: &TerminalUpdate) -> StoreResult<bool> {
        Ok(RefactoringRepo::finish(&self.pool, id, update).await?)
    }

    async fn create_feedback(
        &self,
        refactoring_id: RecordId,
        input: &CreateFeedback,
    ) -> StoreResult<Feedback> {
        FeedbackRepo::create(&self.pool, RecordId::now_v7(), refactoring_id, input)
            .await?
            .ok_or(StoreError::NotFound(refactoring_id))
    }

    async fn list_feedback(&self, refactoring_ids: &[RecordId]) -> StoreResult<Vec<Feedback>> {
        if refactoring_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(FeedbackRepo::list_for_refactorings(&self.pool, refactoring_ids).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}
