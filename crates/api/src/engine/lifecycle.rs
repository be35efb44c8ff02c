//! The refactoring lifecycle controller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use refactorer_core::error::CoreError;
use refactorer_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use refactorer_core::types::RecordId;
use refactorer_core::validation::{
    validate_code, validate_comment, validate_focus_areas, validate_language,
};
use refactorer_db::models::feedback::{CreateFeedback, Feedback};
use refactorer_db::models::refactoring::{NewRefactoring, RefactoringListQuery, SubmitRefactoring};
use refactorer_db::store::{RefactoringStore, StoreError};
use refactorer_intelligence::CodeIntelligence;
use validator::Validate;

use super::snapshot::RefactoringSnapshot;
use super::unit;
use super::workers::WorkerPool;
use super::LifecycleError;

const ENTITY: &str = "Refactoring";

/// Owns the state machine: submit, read, and the one background unit per
/// record.
pub struct LifecycleController {
    store: Arc<dyn RefactoringStore>,
    backend: Arc<dyn CodeIntelligence>,
    workers: WorkerPool,
}

impl LifecycleController {
    /// Start the worker pool and return a ready controller.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        store: Arc<dyn RefactoringStore>,
        backend: Arc<dyn CodeIntelligence>,
        max_concurrent_units: usize,
    ) -> Self {
        let workers = {
            let store = Arc::clone(&store);
            let backend = Arc::clone(&backend);
            WorkerPool::start(max_concurrent_units, move |id| {
                let store = Arc::clone(&store);
                let backend = Arc::clone(&backend);
                async move { unit::process(store.as_ref(), backend.as_ref(), id).await }
            })
        };

        Self {
            store,
            backend,
            workers,
        }
    }

    /// Validate, persist in `processing`, and schedule the background unit.
    ///
    /// Returns the initial snapshot without waiting on the backend. The
    /// language is resolved before the insert so every stored record has one.
    pub async fn submit(
        &self,
        input: SubmitRefactoring,
    ) -> Result<RefactoringSnapshot, LifecycleError> {
        validate_code(&input.original_code)?;
        validate_language(input.language.as_deref())?;
        validate_focus_areas(input.focus_areas.as_deref())?;

        let language = match input.language {
            Some(language) => language,
            None => self.backend.detect_language(&input.original_code).await,
        };

        let new = NewRefactoring {
            id: RecordId::now_v7(),
            original_code: input.original_code,
            language,
            focus_areas: input.focus_areas,
        };
        let record = self.store.create(&new).await?;

        tracing::info!(
            refactoring_id = %record.id,
            language = %record.language,
            code_chars = record.original_code.chars().count(),
            "Refactoring submitted",
        );

        if let Err(e) = self.workers.enqueue(record.id) {
            tracing::error!(
                refactoring_id = %record.id,
                error = %e,
                "Failed to schedule refactoring; record left processing",
            );
        }

        Ok(RefactoringSnapshot::new(record, Vec::new()))
    }

    /// Current snapshot of one record, in whatever state it is.
    pub async fn get(&self, id: RecordId) -> Result<RefactoringSnapshot, LifecycleError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        let feedback = self.store.list_feedback(&[id]).await?;

        Ok(RefactoringSnapshot::new(record, feedback))
    }

    /// A page of snapshots in creation order.
    pub async fn list(
        &self,
        query: &RefactoringListQuery,
    ) -> Result<Vec<RefactoringSnapshot>, LifecycleError> {
        let limit = clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(query.skip);

        let records = self.store.list(offset, limit).await?;
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();

        let mut feedback_by_record: HashMap<RecordId, Vec<Feedback>> = HashMap::new();
        for entry in self.store.list_feedback(&ids).await? {
            feedback_by_record
                .entry(entry.refactoring_id)
                .or_default()
                .push(entry);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let feedback = feedback_by_record.remove(&record.id).unwrap_or_default();
                RefactoringSnapshot::new(record, feedback)
            })
            .collect())
    }

    /// Attach a rating to an existing record.
    pub async fn add_feedback(
        &self,
        refactoring_id: RecordId,
        input: CreateFeedback,
    ) -> Result<Feedback, LifecycleError> {
        input.validate().map_err(CoreError::from)?;
        validate_comment(input.comment.as_deref())?;

        let entry = self
            .store
            .create_feedback(refactoring_id, &input)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(id) => LifecycleError::Core(CoreError::NotFound {
                    entity: ENTITY,
                    id,
                }),
                other => LifecycleError::Store(other),
            })?;

        tracing::info!(
            refactoring_id = %refactoring_id,
            feedback_id = %entry.id,
            rating = entry.rating,
            "Feedback recorded",
        );

        Ok(entry)
    }

    /// Feedback for one record, oldest first.
    pub async fn feedback(&self, refactoring_id: RecordId) -> Result<Vec<Feedback>, LifecycleError> {
        if self.store.find_by_id(refactoring_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: ENTITY,
                id: refactoring_id,
            }
            .into());
        }
        Ok(self.store.list_feedback(&[refactoring_id]).await?)
    }

    /// Stop scheduling and wait up to `timeout` for running units.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.workers.shutdown(timeout).await
    }
}
