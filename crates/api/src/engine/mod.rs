//! Refactoring lifecycle engine.
//!
//! [`LifecycleController`] accepts submissions, persists them in
//! `processing`, and hands each new id to the [`WorkerPool`] exactly once.
//! A worker runs the background unit ([`unit::process`]) which calls the
//! code intelligence backend and writes the single terminal update.

pub mod lifecycle;
pub mod snapshot;
pub mod unit;
pub mod workers;

use refactorer_core::error::CoreError;
use refactorer_db::store::StoreError;

pub use lifecycle::LifecycleController;
pub use snapshot::RefactoringSnapshot;
pub use workers::{QueueClosed, WorkerPool};

/// Errors surfaced by the controller's synchronous operations.
///
/// Backend failures never appear here; they are absorbed into the record as
/// `status = failed`.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
