use std::sync::Arc;

use chrono::{DateTime, Utc};
use portal_core::model::{EmployeeVideoProgress, LearnerId, ProgramId, VideoId, VideoProgress};

use super::{read_json_or_default, write_json};
use crate::kv::{KeyValueStore, StorageError};

/// Namespace key holding every employee's video progress.
pub const VIDEO_PROGRESS_KEY: &str = "video_progress";

fn position_key(video_id: &VideoId) -> String {
    format!("video_progress_{video_id}")
}

fn liked_key(video_id: &VideoId) -> String {
    format!("video_liked_{video_id}")
}

/// Video watch progress: the shared per-employee collection plus the player
/// page's scalar position/liked entries.
#[derive(Clone)]
pub struct VideoProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl VideoProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn list(&self) -> Vec<EmployeeVideoProgress> {
        read_json_or_default(self.kv.as_ref(), VIDEO_PROGRESS_KEY).await
    }

    /// The employee's progress in a program, or `None` if nothing was
    /// recorded.
    pub async fn get_employee(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Option<EmployeeVideoProgress> {
        self.list()
            .await
            .into_iter()
            .find(|p| p.employee_id() == employee_id && p.program_id() == program_id)
    }

    /// Watch state for one video, if the employee ever played it.
    pub async fn get_video(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
        video_id: &VideoId,
    ) -> Option<VideoProgress> {
        self.get_employee(employee_id, program_id)
            .await
            .and_then(|p| p.video(video_id).cloned())
    }

    /// Upserts one video's watch state, recomputing the employee's overall
    /// percentage, and rewrites the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn update_video(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
        video_id: VideoId,
        watched_seconds: u64,
        total_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut all = self.list().await;
        let entry = all
            .iter_mut()
            .find(|p| p.employee_id() == employee_id && p.program_id() == program_id);

        match entry {
            Some(progress) => {
                progress.update_video(video_id, watched_seconds, total_seconds, now);
            }
            None => {
                let mut progress =
                    EmployeeVideoProgress::new(employee_id.clone(), program_id.clone());
                progress.update_video(video_id, watched_seconds, total_seconds, now);
                all.push(progress);
            }
        }

        write_json(self.kv.as_ref(), VIDEO_PROGRESS_KEY, &all).await
    }

    /// Removes the employee's record for a program.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn reset(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Result<(), StorageError> {
        let all = self.list().await;
        let remaining: Vec<EmployeeVideoProgress> = all
            .into_iter()
            .filter(|p| !(p.employee_id() == employee_id && p.program_id() == program_id))
            .collect();
        write_json(self.kv.as_ref(), VIDEO_PROGRESS_KEY, &remaining).await
    }

    // ─── Player page scalars ───────────────────────────────────────────────

    /// Last playback position for a video, in seconds.
    pub async fn player_position(&self, video_id: &VideoId) -> Option<u64> {
        read_json_or_default(self.kv.as_ref(), &position_key(video_id)).await
    }

    /// Stores the playback position for a video.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn set_player_position(
        &self,
        video_id: &VideoId,
        seconds: u64,
    ) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), &position_key(video_id), &seconds).await
    }

    /// Whether the learner liked this video.
    pub async fn is_liked(&self, video_id: &VideoId) -> bool {
        read_json_or_default::<Option<bool>>(self.kv.as_ref(), &liked_key(video_id))
            .await
            .unwrap_or(false)
    }

    /// Stores the liked flag for a video.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn set_liked(&self, video_id: &VideoId, liked: bool) -> Result<(), StorageError> {
        write_json(self.kv.as_ref(), &liked_key(video_id), &liked).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;
    use portal_core::time::fixed_now;

    fn build_store() -> VideoProgressStore {
        VideoProgressStore::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn update_creates_employee_record_and_recomputes() {
        let store = build_store();
        let employee = LearnerId::new("e1");
        let program = ProgramId::new("p1");
        let now = fixed_now();

        store
            .update_video(&employee, &program, VideoId::new("v1"), 95, 100, now)
            .await
            .unwrap();
        store
            .update_video(&employee, &program, VideoId::new("v2"), 10, 100, now)
            .await
            .unwrap();

        let progress = store.get_employee(&employee, &program).await.unwrap();
        assert_eq!(progress.overall_progress(), 50);

        let video = store
            .get_video(&employee, &program, &VideoId::new("v1"))
            .await
            .unwrap();
        assert!(video.completed);
    }

    #[tokio::test]
    async fn reset_only_touches_one_employee_program_pair() {
        let store = build_store();
        let now = fixed_now();
        store
            .update_video(
                &LearnerId::new("e1"),
                &ProgramId::new("p1"),
                VideoId::new("v1"),
                90,
                100,
                now,
            )
            .await
            .unwrap();
        store
            .update_video(
                &LearnerId::new("e2"),
                &ProgramId::new("p1"),
                VideoId::new("v1"),
                90,
                100,
                now,
            )
            .await
            .unwrap();

        store
            .reset(&LearnerId::new("e1"), &ProgramId::new("p1"))
            .await
            .unwrap();

        assert!(
            store
                .get_employee(&LearnerId::new("e1"), &ProgramId::new("p1"))
                .await
                .is_none()
        );
        assert!(
            store
                .get_employee(&LearnerId::new("e2"), &ProgramId::new("p1"))
                .await
                .is_some()
        );
    }

    #[tokio::test]
    async fn player_scalars_roundtrip() {
        let store = build_store();
        let video = VideoId::new("v1");

        assert_eq!(store.player_position(&video).await, None);
        store.set_player_position(&video, 125).await.unwrap();
        assert_eq!(store.player_position(&video).await, Some(125));

        assert!(!store.is_liked(&video).await);
        store.set_liked(&video, true).await.unwrap();
        assert!(store.is_liked(&video).await);
    }
}
