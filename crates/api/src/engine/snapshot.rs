use refactorer_core::analysis::QualityAnalysis;
use refactorer_core::types::{RecordId, Timestamp};
use refactorer_db::models::feedback::Feedback;
use refactorer_db::models::refactoring::Refactoring;
use refactorer_db::models::status::RefactoringStatus;
use serde::Serialize;

/// Read-side view of a refactoring record.
///
/// `analysis_result` is decoded from the stored blob; a blob that fails to
/// decode is reported as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefactoringSnapshot {
    pub id: RecordId,
    pub original_code: String,
    pub language: String,
    pub focus_areas: Option<Vec<String>>,
    pub status: RefactoringStatus,
    pub refactored_code: Option<String>,
    pub explanation: Option<String>,
    pub analysis_result: Option<QualityAnalysis>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub feedback: Vec<Feedback>,
}

impl RefactoringSnapshot {
    pub fn new(record: Refactoring, feedback: Vec<Feedback>) -> Self {
        let analysis_result = QualityAnalysis::decode_lenient(record.analysis_result.as_deref());
        Self {
            status: record.status(),
            id: record.id,
            original_code: record.original_code,
            language: record.language,
            focus_areas: record.focus_areas,
            refactored_code: record.refactored_code,
            explanation: record.explanation,
            analysis_result,
            created_at: record.created_at,
            updated_at: record.updated_at,
            feedback,
        }
    }
}
