//! The background unit of work for one refactoring record.

use refactorer_core::types::RecordId;
use refactorer_db::models::refactoring::{Refactoring, TerminalUpdate};
use refactorer_db::store::RefactoringStore;
use refactorer_intelligence::{BackendError, CodeIntelligence};

/// Upper bound on the failure text stored in `explanation`.
const MAX_FAILURE_EXPLANATION_CHARS: usize = 500;

/// Why a unit ended in `failed`.
#[derive(Debug, thiserror::Error)]
enum UnitError {
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("analysis could not be serialized: {0}")]
    Encode(#[from] serde_json::Error),
}

impl UnitError {
    /// Failure text persisted on the record and shown to every reader.
    fn explanation(&self) -> String {
        let summary = match self {
            UnitError::Backend(e) => e.summary(),
            UnitError::Encode(_) => "analysis could not be serialized".to_string(),
        };
        let text = format!("Refactoring failed: {summary}");
        match text.char_indices().nth(MAX_FAILURE_EXPLANATION_CHARS) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        }
    }
}

/// Run analysis and refactoring for `id` and write the terminal state.
///
/// Never returns an error: backend failures become a `failed` record, and
/// store failures are logged with the record left as it was.
pub async fn process(store: &dyn RefactoringStore, backend: &dyn CodeIntelligence, id: RecordId) {
    let record = match store.find_by_id(id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::error!(refactoring_id = %id, "Refactoring record missing; unit abandoned");
            return;
        }
        Err(e) => {
            tracing::error!(
                refactoring_id = %id,
                error = %e,
                "Failed to load refactoring record; unit abandoned",
            );
            return;
        }
    };

    if record.status().is_terminal() {
        tracing::warn!(
            refactoring_id = %id,
            status = %record.status(),
            "Refactoring already terminal; unit skipped",
        );
        return;
    }

    let update = match run_backend(backend, &record).await {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(
                refactoring_id = %id,
                backend = backend.name(),
                error = %e,
                "Refactoring failed",
            );
            TerminalUpdate::Failed {
                explanation: e.explanation(),
            }
        }
    };

    let status = update.status();
    match store.update(id, &update).await {
        Ok(true) => match &update {
            TerminalUpdate::Completed { .. } => {
                tracing::info!(refactoring_id = %id, %status, "Refactoring completed");
            }
            TerminalUpdate::Failed { .. } => {
                tracing::info!(refactoring_id = %id, %status, "Refactoring marked failed");
            }
        },
        Ok(false) => {
            tracing::warn!(
                refactoring_id = %id,
                %status,
                "Refactoring no longer processing; terminal result discarded",
            );
        }
        Err(e) => {
            tracing::error!(
                refactoring_id = %id,
                %status,
                error = %e,
                "Failed to persist terminal state; record left processing",
            );
        }
    }
}

async fn run_backend(
    backend: &dyn CodeIntelligence,
    record: &Refactoring,
) -> Result<TerminalUpdate, UnitError> {
    let analysis = backend
        .analyze_quality(&record.original_code, &record.language)
        .await?;
    let output = backend
        .refactor(
            &record.original_code,
            &record.language,
            record.focus_areas.as_deref(),
        )
        .await?;

    Ok(TerminalUpdate::Completed {
        refactored_code: output.refactored_code,
        explanation: output.explanation,
        analysis_result: analysis.encode()?,
    })
}
