//! In-process [`RefactoringStore`] for offline runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use refactorer_core::types::RecordId;
use tokio::sync::RwLock;

use crate::models::feedback::{CreateFeedback, Feedback};
use crate::models::refactoring::{NewRefactoring, Refactoring, TerminalUpdate};
use crate::models::status::RefactoringStatus;

use super::{RefactoringStore, StoreError, StoreResult};

/// Thread-safe in-memory store. Records keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: IndexMap<RecordId, Refactoring>,
    feedback: Vec<Feedback>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefactoringStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, input: &NewRefactoring) -> StoreResult<Refactoring> {
        let mut state = self.state.write().await;
        if state.records.contains_key(&input.id) {
            return Err(StoreError::Duplicate(input.id));
        }
        let now = Utc::now();
        let record = Refactoring {
            id: input.id,
            original_code: input.original_code.clone(),
            language: input.language.clone(),
            focus_areas: input.focus_areas.clone(),
            status_id: RefactoringStatus::Processing.id(),
            refactored_code: None,
            explanation: None,
            analysis_result: None,
            created_at: now,
            updated_at: now,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Refactoring>> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> StoreResult<Vec<Refactoring>> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .state
            .read()
            .await
            .records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(&self, id: RecordId, update: &TerminalUpdate) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(record) = state.records.get_mut(&id) else {
            return Ok(false);
        };
        if !record.status().can_transition_to(update.status()) {
            return Ok(false);
        }
        let (refactored_code, explanation, analysis_result) = update.columns();
        record.status_id = update.status().id();
        record.refactored_code = refactored_code.map(str::to_owned);
        record.explanation = Some(explanation.to_owned());
        record.analysis_result = analysis_result.map(str::to_owned);
        record.updated_at = Utc::now();
        Ok(true)
    }

    async fn create_feedback(
        &self,
        refactoring_id: RecordId,
        input: &CreateFeedback,
    ) -> StoreResult<Feedback> {
        let mut state = self.state.write().await;
        if !state.records.contains_key(&refactoring_id) {
            return Err(StoreError::NotFound(refactoring_id));
        }
        let entry = Feedback {
            id: RecordId::now_v7(),
            refactoring_id,
            rating: input.rating,
            comment: input.comment.clone(),
            created_at: Utc::now(),
        };
        state.feedback.push(entry.clone());
        Ok(entry)
    }

    async fn list_feedback(&self, refactoring_ids: &[RecordId]) -> StoreResult<Vec<Feedback>> {
        Ok(self
            .state
            .read()
            .await
            .feedback
            .iter()
            .filter(|f| refactoring_ids.contains(&f.refactoring_id))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn new_record(code: &str) -> NewRefactoring {
        NewRefactoring {
            id: RecordId::now_v7(),
            original_code: code.to_string(),
            language: "python".to_string(),
            focus_areas: None,
        }
    }

    fn completed() -> TerminalUpdate {
        TerminalUpdate::Completed {
            refactored_code: "return sum(numbers)".into(),
            explanation: "Used sum()".into(),
            analysis_result: "{}".into(),
        }
    }

    #[tokio::test]
    async fn create_starts_in_processing() {
        let store = MemoryStore::new();
        let record = store.create(&new_record("x = 1")).await.unwrap();

        assert_eq!(record.status(), RefactoringStatus::Processing);
        assert!(record.refactored_code.is_none());
        assert!(record.explanation.is_none());
        assert!(record.analysis_result.is_none());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        let input = new_record("x = 1");
        store.create(&input).await.unwrap();

        assert_matches!(store.create(&input).await, Err(StoreError::Duplicate(id)) if id == input.id);
    }

    #[tokio::test]
    async fn find_unknown_id_is_none() {
        let store = MemoryStore::new();
        store.create(&new_record("x = 1")).await.unwrap();

        assert!(store.find_by_id(RecordId::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_preserves_creation_order_and_pages() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.create(&new_record(&format!("x = {i}"))).await.unwrap().id);
        }

        let page: Vec<_> = store.list(1, 2).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(page, ids[1..3].to_vec());

        assert!(store.list(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_applies_terminal_fields_once() {
        let store = MemoryStore::new();
        let record = store.create(&new_record("x = 1")).await.unwrap();

        assert!(store.update(record.id, &completed()).await.unwrap());
        let failed = TerminalUpdate::Failed {
            explanation: "late failure".into(),
        };
        assert!(!store.update(record.id, &failed).await.unwrap());

        let stored = store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), RefactoringStatus::Completed);
        assert_eq!(stored.refactored_code.as_deref(), Some("return sum(numbers)"));
        assert_eq!(stored.explanation.as_deref(), Some("Used sum()"));
        assert!(stored.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_a_no_op() {
        let store = MemoryStore::new();
        assert!(!store.update(RecordId::now_v7(), &completed()).await.unwrap());
    }

    #[tokio::test]
    async fn feedback_requires_existing_parent() {
        let store = MemoryStore::new();
        let missing = RecordId::now_v7();
        let input = CreateFeedback {
            rating: 3,
            comment: None,
        };

        assert_matches!(
            store.create_feedback(missing, &input).await,
            Err(StoreError::NotFound(id)) if id == missing
        );
    }

    #[tokio::test]
    async fn feedback_is_listed_per_record() {
        let store = MemoryStore::new();
        let a = store.create(&new_record("a = 1")).await.unwrap();
        let b = store.create(&new_record("b = 1")).await.unwrap();
        let input = CreateFeedback {
            rating: 4,
            comment: Some("clean".into()),
        };
        store.create_feedback(a.id, &input).await.unwrap();
        store.create_feedback(b.id, &input).await.unwrap();
        store.create_feedback(a.id, &input).await.unwrap();

        let for_a = store.list_feedback(&[a.id]).await.unwrap();
        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|f| f.refactoring_id == a.id));
        assert_eq!(store.list_feedback(&[a.id, b.id]).await.unwrap().len(), 3);
    }
}
