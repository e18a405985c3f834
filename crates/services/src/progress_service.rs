use std::collections::HashMap;

use portal_core::Clock;
use portal_core::model::{
    LearnerId, ModuleId, ProgramId, ProgramProgress, ProgramStatus, format_time_spent,
};
use storage::kv::StorageError;
use storage::stores::ModuleProgressStore;

/// One row of the learner's program dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSummary {
    pub program_id: ProgramId,
    pub overall_progress: u8,
    pub status: ProgramStatus,
    pub completed_modules: usize,
    pub time_spent: String,
}

/// Learner-facing module progress: reads tolerate missing records, writes
/// go through the aggregate so the overall percentage stays derived.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    store: ModuleProgressStore,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, store: ModuleProgressStore) -> Self {
        Self { clock, store }
    }

    /// Raw progress record, if the learner ever touched the program.
    pub async fn program_progress(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Option<ProgramProgress> {
        self.store.get(learner_id, program_id).await
    }

    /// Overall percentage per program; programs never touched map to zero.
    pub async fn all_programs_progress(
        &self,
        learner_id: &LearnerId,
        program_ids: &[ProgramId],
    ) -> HashMap<ProgramId, u8> {
        let mut map = HashMap::with_capacity(program_ids.len());
        for program_id in program_ids {
            let percent = self
                .store
                .get(learner_id, program_id)
                .await
                .map_or(0, |p| p.overall_progress());
            map.insert(program_id.clone(), percent);
        }
        map
    }

    /// Dashboard row for one program.
    pub async fn summary(&self, learner_id: &LearnerId, program_id: &ProgramId) -> ProgramSummary {
        match self.store.get(learner_id, program_id).await {
            Some(progress) => ProgramSummary {
                program_id: program_id.clone(),
                overall_progress: progress.overall_progress(),
                status: progress.status(),
                completed_modules: progress.completed_modules_count(),
                time_spent: format_time_spent(progress.total_time_spent_secs()),
            },
            None => ProgramSummary {
                program_id: program_id.clone(),
                overall_progress: 0,
                status: ProgramStatus::NotStarted,
                completed_modules: 0,
                time_spent: format_time_spent(0),
            },
        }
    }

    pub async fn is_program_completed(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> bool {
        self.store
            .get(learner_id, program_id)
            .await
            .is_some_and(|p| p.is_completed())
    }

    pub async fn program_status(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> ProgramStatus {
        self.store
            .get(learner_id, program_id)
            .await
            .map_or(ProgramStatus::NotStarted, |p| p.status())
    }

    /// Where to send the learner next: the first incomplete module, the first
    /// module if they never started, or `None` once everything is done.
    pub async fn next_module(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Option<ModuleId> {
        match self.store.get(learner_id, program_id).await {
            Some(progress) if progress.is_completed() => None,
            Some(progress) => progress
                .next_incomplete_module()
                .or(Some(ModuleId::new(0))),
            None => Some(ModuleId::new(0)),
        }
    }

    /// Marks a module completed, creating the program record on first touch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn complete_module(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
        module_id: ModuleId,
    ) -> Result<ProgramProgress, StorageError> {
        let now = self.clock.now();
        let mut progress = self
            .store
            .get(learner_id, program_id)
            .await
            .unwrap_or_else(|| ProgramProgress::new(program_id.clone(), now));
        progress.complete_module(module_id, now);
        self.store.put(learner_id, &progress).await?;
        tracing::debug!(
            learner = %learner_id,
            program = %program_id,
            module = %module_id,
            overall = progress.overall_progress(),
            "module completed"
        );
        Ok(progress)
    }

    /// Records a finished topic and its reading time inside a module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn record_topic(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
        module_id: ModuleId,
        topic_index: u32,
        time_spent_secs: u64,
    ) -> Result<ProgramProgress, StorageError> {
        let now = self.clock.now();
        let mut progress = self
            .store
            .get(learner_id, program_id)
            .await
            .unwrap_or_else(|| ProgramProgress::new(program_id.clone(), now));
        progress.record_topic(module_id, topic_index, time_spent_secs, now);
        self.store.put(learner_id, &progress).await?;
        Ok(progress)
    }

    /// Wipes the learner's record for a program.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be performed.
    pub async fn reset(
        &self,
        learner_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Result<(), StorageError> {
        self.store.reset(learner_id, program_id).await
    }
}
