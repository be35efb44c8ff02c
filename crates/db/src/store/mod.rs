//! The refactoring record store port.
//!
//! The lifecycle engine and HTTP handlers only see [`RefactoringStore`].
//! [`PgStore`] backs it with PostgreSQL via the repositories;
//! [`MemoryStore`] keeps everything in process for offline runs and tests.

use async_trait::async_trait;
use refactorer_core::types::RecordId;

use crate::models::feedback::{CreateFeedback, Feedback};
use crate::models::refactoring::{NewRefactoring, Refactoring, TerminalUpdate};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced refactoring does not exist.
    #[error("refactoring {0} not found")]
    NotFound(RecordId),

    /// A record with the same id already exists.
    #[error("duplicate refactoring id {0}")]
    Duplicate(RecordId),

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable, keyed storage for refactoring records and their feedback.
///
/// Every method is an independently committed operation; no lock is held
/// across calls.
#[async_trait]
pub trait RefactoringStore: Send + Sync {
    /// Short adapter name for logs and health output.
    fn kind(&self) -> &'static str;

    /// Persist a new record in `processing` status.
    ///
    /// # Errors
    ///
    /// [`StoreError::Duplicate`] if the id is taken, [`StoreError::Database`]
    /// on persistence failure.
    async fn create(&self, input: &NewRefactoring) -> StoreResult<Refactoring>;

    /// Point lookup; `None` when the id is unknown.
    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Refactoring>>;

    /// A page of records in creation order.
    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Refactoring>>;

    /// Atomically apply the terminal field set.
    ///
    /// Returns `false` without writing when the record is missing or no
    /// longer `processing`.
    async fn update(&self, id: RecordId, update: &TerminalUpdate) -> StoreResult<bool>;

    /// Attach feedback to an existing record.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if `refactoring_id` does not exist.
    async fn create_feedback(
        &self,
        refactoring_id: RecordId,
        input: &CreateFeedback,
    ) -> StoreResult<Feedback>;

    /// Feedback for every listed record, oldest first.
    async fn list_feedback(&self, refactoring_ids: &[RecordId]) -> StoreResult<Vec<Feedback>>;

    /// Confirm the store is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
