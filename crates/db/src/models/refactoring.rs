//! Refactoring request models and DTOs.

use refactorer_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{RefactoringStatus, StatusId};

/// A row from the `code_refactorings` table.
///
/// `analysis_result` is the opaque serialized quality analysis; it is only
/// decoded at the read boundary.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Refactoring {
    pub id: RecordId,
    pub original_code: String,
    pub language: String,
    pub focus_areas: Option<Vec<String>>,
    pub status_id: StatusId,
    pub refactored_code: Option<String>,
    pub explanation: Option<String>,
    pub analysis_result: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Refactoring {
    /// Resolve the lookup status; unknown IDs are treated as still processing.
    pub fn status(&self) -> RefactoringStatus {
        RefactoringStatus::from_id(self.status_id).unwrap_or(RefactoringStatus::Processing)
    }
}

/// DTO for submitting a new refactoring via `POST /api/v1/refactoring`.
///
/// `original_code` defaults to empty when missing so that the omission is
/// reported as a validation failure rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitRefactoring {
    #[serde(default)]
    pub original_code: String,
    pub language: Option<String>,
    pub focus_areas: Option<Vec<String>>,
}

/// Insert payload for a new record. The caller assigns the id and has
/// already resolved the language; the store owns the timestamps.
#[derive(Debug, Clone)]
pub struct NewRefactoring {
    pub id: RecordId,
    pub original_code: String,
    pub language: String,
    pub focus_areas: Option<Vec<String>>,
}

/// The single write that moves a record out of `processing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalUpdate {
    Completed {
        refactored_code: String,
        explanation: String,
        analysis_result: String,
    },
    Failed {
        explanation: String,
    },
}

impl TerminalUpdate {
    /// The status this update transitions to.
    pub fn status(&self) -> RefactoringStatus {
        match self {
            TerminalUpdate::Completed { .. } => RefactoringStatus::Completed,
            TerminalUpdate::Failed { .. } => RefactoringStatus::Failed,
        }
    }

    /// Split into the nullable column values written by the update.
    pub fn columns(&self) -> (Option<&str>, &str, Option<&str>) {
        match self {
            TerminalUpdate::Completed {
                refactored_code,
                explanation,
                analysis_result,
            } => (
                Some(refactored_code.as_str()),
                explanation.as_str(),
                Some(analysis_result.as_str()),
            ),
            TerminalUpdate::Failed { explanation } => (None, explanation.as_str(), None),
        }
    }
}

/// Query parameters for `GET /api/v1/refactoring`.
#[derive(Debug, Default, Deserialize)]
pub struct RefactoringListQuery {
    /// Number of records to skip. Defaults to 0.
    #[serde(alias = "offset")]
    pub skip: Option<i64>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_update_carries_all_result_columns() {
        let update = TerminalUpdate::Completed {
            refactored_code: "return sum(numbers)".into(),
            explanation: "Used sum()".into(),
            analysis_result: "{}".into(),
        };
        assert_eq!(update.status(), RefactoringStatus::Completed);
        assert_eq!(
            update.columns(),
            (Some("return sum(numbers)"), "Used sum()", Some("{}"))
        );
    }

    #[test]
    fn failed_update_clears_result_columns() {
        let update = TerminalUpdate::Failed {
            explanation: "backend unavailable".into(),
        };
        assert_eq!(update.status(), RefactoringStatus::Failed);
        assert_eq!(update.columns(), (None, "backend unavailable", None));
    }

    #[test]
    fn missing_original_code_deserializes_as_empty() {
        let dto: SubmitRefactoring = serde_json::from_str(r#"{"language":"python"}"#).unwrap();
        assert!(dto.original_code.is_empty());
        assert_eq!(dto.language.as_deref(), Some("python"));
        assert!(dto.focus_areas.is_none());
    }

    #[test]
    fn list_query_accepts_offset_alias() {
        let query: RefactoringListQuery = serde_json::from_str(r#"{"offset":5}"#).unwrap();
        assert_eq!(query.skip, Some(5));
    }
}
