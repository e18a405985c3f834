use std::sync::Arc;

use portal_core::model::{LearnerId, ProgramId, ProgramProgress};

use super::{read_json_or_default, write_json};
use crate::kv::{KeyValueStore, StorageError};

fn progress_key(learner_id: &LearnerId, program_id: &ProgramId) -> String {
    format!("module_progress_{learner_id}_{program_id}")
}

/// Per-learner, per-program module progress under
/// `module_progress_{learnerId}_{programId}` keys.
///
/// The learner id lives only in the key; the persisted record carries the
/// program id, matching the original entries.
#[derive(Clone)]
pub struct ModuleProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ModuleProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The learner's progress in a program, or `None` if nothing was
    /// recorded (or the record does not parse).
    pub async fn get(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Option<ProgramProgress> {
        read_json_or_default(self.kv.as_ref(), &progress_key(learner_id, program_id)).await
    }

    /// Writes the whole aggregate back. Callers mutate through
    /// `ProgramProgress` methods so the derived overall percentage is always
    /// recomputed before it lands here.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn put(
        &self,
        learner_id: &LearnerId,
        progress: &ProgramProgress,
    ) -> Result<(), StorageError> {
        write_json(
            self.kv.as_ref(),
            &progress_key(learner_id, progress.program_id()),
            progress,
        )
        .await
    }

    /// Removes the learner's record for a program.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be performed.
    pub async fn reset(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Result<(), StorageError> {
        self.kv
            .delete(&progress_key(learner_id, program_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;
    use portal_core::model::ModuleId;
    use portal_core::time::fixed_now;

    fn build_store() -> ModuleProgressStore {
        ModuleProgressStore::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn absent_record_reads_as_none() {
        let store = build_store();
        let got = store
            .get(&LearnerId::new("l1"), &ProgramId::new("p1"))
            .await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn put_get_reset_roundtrip() {
        let store = build_store();
        let learner = LearnerId::new("l1");
        let now = fixed_now();

        let mut progress = ProgramProgress::new(ProgramId::new("p1"), now);
        progress.complete_module(ModuleId::new(0), now);
        store.put(&learner, &progress).await.unwrap();

        let got = store.get(&learner, &ProgramId::new("p1")).await.unwrap();
        assert_eq!(got.overall_progress(), 100);

        store
            .reset(&learner, &ProgramId::new("p1"))
            .await
            .unwrap();
        assert!(store.get(&learner, &ProgramId::new("p1")).await.is_none());
    }

    #[tokio::test]
    async fn records_are_scoped_per_learner() {
        let store = build_store();
        let now = fixed_now();
        let progress = ProgramProgress::new(ProgramId::new("p1"), now);
        store.put(&LearnerId::new("l1"), &progress).await.unwrap();

        assert!(
            store
                .get(&LearnerId::new("l2"), &ProgramId::new("p1"))
                .await
                .is_none()
        );
    }
}
