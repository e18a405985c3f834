use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{ModuleId, ProgramId};

/// Where a learner stands inside a program, derived from the overall
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Per-module completion state inside a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: ModuleId,
    pub completed: bool,
    pub topics_completed: BTreeSet<u32>,
    #[serde(rename = "timeSpent")]
    pub time_spent_secs: u64,
    pub last_accessed: DateTime<Utc>,
}

impl ModuleProgress {
    #[must_use]
    pub fn started(module_id: ModuleId, now: DateTime<Utc>) -> Self {
        Self {
            module_id,
            completed: false,
            topics_completed: BTreeSet::new(),
            time_spent_secs: 0,
            last_accessed: now,
        }
    }
}

/// Per-learner, per-program progress aggregate.
///
/// `overall_progress` is derived and recomputed on every mutation; it is 100
/// exactly when every module is completed. Callers never patch it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramProgress {
    program_id: ProgramId,
    modules: Vec<ModuleProgress>,
    overall_progress: u8,
    started_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
}

impl ProgramProgress {
    #[must_use]
    pub fn new(program_id: ProgramId, now: DateTime<Utc>) -> Self {
        Self {
            program_id,
            modules: Vec::new(),
            overall_progress: 0,
            started_at: now,
            last_accessed: now,
        }
    }

    #[must_use]
    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleProgress] {
        &self.modules
    }

    #[must_use]
    pub fn overall_progress(&self) -> u8 {
        self.overall_progress
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    #[must_use]
    pub fn module(&self, module_id: ModuleId) -> Option<&ModuleProgress> {
        self.modules.iter().find(|m| m.module_id == module_id)
    }

    /// Inserts or replaces one module's state, then recomputes the aggregate.
    pub fn upsert_module(&mut self, module: ModuleProgress, now: DateTime<Utc>) {
        match self
            .modules
            .iter_mut()
            .find(|m| m.module_id == module.module_id)
        {
            Some(existing) => *existing = module,
            None => self.modules.push(module),
        }
        self.last_accessed = now;
        self.recompute_overall();
    }

    /// Marks a module completed, creating its entry if the learner never
    /// opened it before.
    pub fn complete_module(&mut self, module_id: ModuleId, now: DateTime<Utc>) {
        let mut module = self
            .module(module_id)
            .cloned()
            .unwrap_or_else(|| ModuleProgress::started(module_id, now));
        module.completed = true;
        module.last_accessed = now;
        self.upsert_module(module, now);
    }

    /// Adds a finished topic and time spent to a module without completing it.
    pub fn record_topic(
        &mut self,
        module_id: ModuleId,
        topic_index: u32,
        time_spent_secs: u64,
        now: DateTime<Utc>,
    ) {
        let mut module = self
            .module(module_id)
            .cloned()
            .unwrap_or_else(|| ModuleProgress::started(module_id, now));
        module.topics_completed.insert(topic_index);
        module.time_spent_secs += time_spent_secs;
        module.last_accessed = now;
        self.upsert_module(module, now);
    }

    fn recompute_overall(&mut self) {
        let total = self.modules.len();
        if total == 0 {
            self.overall_progress = 0;
            return;
        }
        let completed = self.completed_modules_count();
        // 100 and 0 are reserved for the exact endpoints so the percentage,
        // `is_completed` and `status` never disagree; rounding stays inside
        // 1..=99 for partial progress.
        self.overall_progress = if completed == total {
            100
        } else if completed == 0 {
            0
        } else {
            let rounded = (200 * completed + total) / (2 * total);
            u8::try_from(rounded.clamp(1, 99)).unwrap_or(99)
        };
    }

    /// True when every module is completed (and there is at least one).
    #[must_use]
    pub fn is_completed(&self) -> bool {
        !self.modules.is_empty() && self.modules.iter().all(|m| m.completed)
    }

    #[must_use]
    pub fn completed_modules_count(&self) -> usize {
        self.modules.iter().filter(|m| m.completed).count()
    }

    #[must_use]
    pub fn total_time_spent_secs(&self) -> u64 {
        self.modules.iter().map(|m| m.time_spent_secs).sum()
    }

    /// First module not yet completed, in insertion order.
    #[must_use]
    pub fn next_incomplete_module(&self) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|m| !m.completed)
            .map(|m| m.module_id)
    }

    #[must_use]
    pub fn status(&self) -> ProgramStatus {
        match self.overall_progress {
            0 => ProgramStatus::NotStarted,
            100 => ProgramStatus::Completed,
            _ => ProgramStatus::InProgress,
        }
    }
}

/// Renders seconds as the portal shows them: `2 ч 5 мин` or `45 мин`.
#[must_use]
pub fn format_time_spent(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours} ч {minutes} мин")
    } else {
        format!("{minutes} мин")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn program_with_modules(completed: usize, total: usize) -> ProgramProgress {
        let now = fixed_now();
        let mut progress = ProgramProgress::new(ProgramId::new("p1"), now);
        for i in 0..total {
            let mut module = ModuleProgress::started(ModuleId::new(i as u32), now);
            module.completed = i < completed;
            progress.upsert_module(module, now);
        }
        progress
    }

    #[test]
    fn overall_progress_tracks_completed_share() {
        assert_eq!(program_with_modules(2, 4).overall_progress(), 50);
        assert_eq!(program_with_modules(4, 4).overall_progress(), 100);
        assert_eq!(program_with_modules(0, 4).overall_progress(), 0);
    }

    #[test]
    fn hundred_percent_means_program_completed() {
        let progress = program_with_modules(4, 4);
        assert!(progress.is_completed());
        assert_eq!(progress.status(), ProgramStatus::Completed);
    }

    #[test]
    fn partial_progress_is_in_progress() {
        let progress = program_with_modules(1, 3);
        assert!(!progress.is_completed());
        assert_eq!(progress.status(), ProgramStatus::InProgress);
    }

    #[test]
    fn empty_program_is_not_started() {
        let progress = ProgramProgress::new(ProgramId::new("p1"), fixed_now());
        assert_eq!(progress.overall_progress(), 0);
        assert!(!progress.is_completed());
        assert_eq!(progress.status(), ProgramStatus::NotStarted);
    }

    #[test]
    fn complete_module_recomputes_aggregate() {
        let mut progress = program_with_modules(1, 2);
        progress.complete_module(ModuleId::new(1), fixed_now());
        assert_eq!(progress.overall_progress(), 100);
    }

    #[test]
    fn next_incomplete_module_follows_insertion_order() {
        let progress = program_with_modules(2, 4);
        assert_eq!(progress.next_incomplete_module(), Some(ModuleId::new(2)));
        assert_eq!(program_with_modules(4, 4).next_incomplete_module(), None);
    }

    #[test]
    fn almost_complete_large_program_stays_below_hundred() {
        // 199 of 200 would round to 100; the endpoint is reserved.
        let progress = program_with_modules(199, 200);
        assert_ne!(progress.overall_progress(), 100);
        assert!(!progress.is_completed());
        assert_eq!(progress.status(), ProgramStatus::InProgress);
    }

    #[test]
    fn any_completed_module_lifts_progress_above_zero() {
        // 1 of 201 would round to 0; recorded progress must show.
        let progress = program_with_modules(1, 201);
        assert_ne!(progress.overall_progress(), 0);
        assert_eq!(progress.status(), ProgramStatus::InProgress);
    }

    #[test]
    fn record_topic_accumulates_time() {
        let now = fixed_now();
        let mut progress = ProgramProgress::new(ProgramId::new("p1"), now);
        progress.record_topic(ModuleId::new(0), 0, 120, now);
        progress.record_topic(ModuleId::new(0), 1, 60, now);
        assert_eq!(progress.total_time_spent_secs(), 180);
        let module = progress.module(ModuleId::new(0)).unwrap();
        assert_eq!(module.topics_completed.len(), 2);
    }

    #[test]
    fn formats_time_in_hours_and_minutes() {
        assert_eq!(format_time_spent(7500), "2 ч 5 мин");
        assert_eq!(format_time_spent(2700), "45 мин");
    }
}
