use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{LearnerId, ProgramId, VideoId};

/// Watch state for one training video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    pub video_id: VideoId,
    pub watched_seconds: u64,
    pub total_seconds: u64,
    pub completed: bool,
    pub last_watched_at: DateTime<Utc>,
}

/// A video counts as watched once 90% of it has been played.
///
/// The boundary is inclusive: 90 of 100 seconds completes, 89 does not.
#[must_use]
pub fn is_watched(watched_seconds: u64, total_seconds: u64) -> bool {
    total_seconds > 0 && watched_seconds * 10 >= total_seconds * 9
}

/// Per-employee, per-program video watch aggregate.
///
/// `overall_progress` is the rounded share of completed videos and is
/// recomputed on every update, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeVideoProgress {
    employee_id: LearnerId,
    program_id: ProgramId,
    videos: BTreeMap<VideoId, VideoProgress>,
    overall_progress: u8,
}

impl EmployeeVideoProgress {
    #[must_use]
    pub fn new(employee_id: LearnerId, program_id: ProgramId) -> Self {
        Self {
            employee_id,
            program_id,
            videos: BTreeMap::new(),
            overall_progress: 0,
        }
    }

    #[must_use]
    pub fn employee_id(&self) -> &LearnerId {
        &self.employee_id
    }

    #[must_use]
    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    #[must_use]
    pub fn videos(&self) -> &BTreeMap<VideoId, VideoProgress> {
        &self.videos
    }

    #[must_use]
    pub fn video(&self, video_id: &VideoId) -> Option<&VideoProgress> {
        self.videos.get(video_id)
    }

    #[must_use]
    pub fn overall_progress(&self) -> u8 {
        self.overall_progress
    }

    /// Upserts one video's watch state and recomputes the aggregate.
    pub fn update_video(
        &mut self,
        video_id: VideoId,
        watched_seconds: u64,
        total_seconds: u64,
        now: DateTime<Utc>,
    ) {
        let completed = is_watched(watched_seconds, total_seconds);
        self.videos.insert(
            video_id.clone(),
            VideoProgress {
                video_id,
                watched_seconds,
                total_seconds,
                completed,
                last_watched_at: now,
            },
        );
        self.recompute_overall();
    }

    fn recompute_overall(&mut self) {
        let total = self.videos.len();
        if total == 0 {
            self.overall_progress = 0;
            return;
        }
        let completed = self.videos.values().filter(|v| v.completed).count();
        let rounded = (200 * completed + total) / (2 * total);
        self.overall_progress = u8::try_from(rounded).unwrap_or(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn ninety_percent_boundary_is_inclusive() {
        assert!(!is_watched(89, 100));
        assert!(is_watched(90, 100));
        assert!(is_watched(100, 100));
    }

    #[test]
    fn zero_length_video_never_completes() {
        assert!(!is_watched(0, 0));
    }

    #[test]
    fn overall_progress_counts_completed_videos() {
        let now = fixed_now();
        let mut progress =
            EmployeeVideoProgress::new(LearnerId::new("e1"), ProgramId::new("p1"));
        progress.update_video(VideoId::new("v1"), 95, 100, now);
        progress.update_video(VideoId::new("v2"), 10, 100, now);
        assert_eq!(progress.overall_progress(), 50);

        progress.update_video(VideoId::new("v2"), 91, 100, now);
        assert_eq!(progress.overall_progress(), 100);
    }

    #[test]
    fn update_overwrites_previous_watch_state() {
        let now = fixed_now();
        let mut progress =
            EmployeeVideoProgress::new(LearnerId::new("e1"), ProgramId::new("p1"));
        progress.update_video(VideoId::new("v1"), 10, 100, now);
        progress.update_video(VideoId::new("v1"), 92, 100, now);

        let video = progress.video(&VideoId::new("v1")).unwrap();
        assert_eq!(video.watched_seconds, 92);
        assert!(video.completed);
        assert_eq!(progress.videos().len(), 1);
    }

    #[test]
    fn serializes_in_camel_case() {
        let now = fixed_now();
        let mut progress =
            EmployeeVideoProgress::new(LearnerId::new("e1"), ProgramId::new("p1"));
        progress.update_video(VideoId::new("v1"), 90, 100, now);

        let json = serde_json::to_value(&progress).unwrap();
        assert!(json.get("employeeId").is_some());
        assert!(json.get("overallProgress").is_some());
        assert!(json["videos"]["v1"].get("watchedSeconds").is_some());
    }
}
