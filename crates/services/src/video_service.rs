use portal_core::Clock;
use portal_core::model::{EmployeeVideoProgress, LearnerId, ModuleId, ProgramId, VideoId, VideoProgress};
use storage::kv::StorageError;
use storage::stores::{CustomVideoStore, VideoProgressStore};

use crate::error::UploadError;
use crate::video_uploader::VideoUploader;

/// Video watching and custom-link management for program modules.
#[derive(Clone)]
pub struct VideoService {
    clock: Clock,
    progress: VideoProgressStore,
    custom: CustomVideoStore,
}

impl VideoService {
    #[must_use]
    pub fn new(clock: Clock, progress: VideoProgressStore, custom: CustomVideoStore) -> Self {
        Self {
            clock,
            progress,
            custom,
        }
    }

    /// The employee's video progress in a program, if any was recorded.
    pub async fn employee_progress(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Option<EmployeeVideoProgress> {
        self.progress.get_employee(employee_id, program_id).await
    }

    /// Watch state for one video.
    pub async fn video_progress(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
        video_id: &VideoId,
    ) -> Option<VideoProgress> {
        self.progress
            .get_video(employee_id, program_id, video_id)
            .await
    }

    /// Records how far the employee got in a video. Completion and the
    /// overall percentage are derived inside the aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn update_watch(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
        video_id: VideoId,
        watched_seconds: u64,
        total_seconds: u64,
    ) -> Result<(), StorageError> {
        self.progress
            .update_video(
                employee_id,
                program_id,
                video_id,
                watched_seconds,
                total_seconds,
                self.clock.now(),
            )
            .await
    }

    /// Wipes the employee's video progress for a program.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn reset(
        &self,
        employee_id: &LearnerId,
        program_id: &ProgramId,
    ) -> Result<(), StorageError> {
        self.progress.reset(employee_id, program_id).await
    }

    // ─── Player page ───────────────────────────────────────────────────────

    /// Last playback position, for resuming where the learner left off.
    pub async fn player_position(&self, video_id: &VideoId) -> Option<u64> {
        self.progress.player_position(video_id).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn set_player_position(
        &self,
        video_id: &VideoId,
        seconds: u64,
    ) -> Result<(), StorageError> {
        self.progress.set_player_position(video_id, seconds).await
    }

    pub async fn is_liked(&self, video_id: &VideoId) -> bool {
        self.progress.is_liked(video_id).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn set_liked(&self, video_id: &VideoId, liked: bool) -> Result<(), StorageError> {
        self.progress.set_liked(video_id, liked).await
    }

    // ─── Custom module videos ──────────────────────────────────────────────

    /// Custom video URL linked to a module, if any.
    pub async fn custom_video(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
    ) -> Option<String> {
        self.custom.get(program_id, module_id).await
    }

    /// Links an already-hosted video URL to a module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` for an unparseable URL, or a
    /// backend error if the write fails.
    pub async fn link_custom_video(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
        video_url: &str,
    ) -> Result<(), StorageError> {
        self.custom.set(program_id, module_id, video_url).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn unlink_custom_video(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
    ) -> Result<(), StorageError> {
        self.custom.remove(program_id, module_id).await
    }

    /// Uploads a video file and links the returned URL to the module in one
    /// step. Nothing is linked if the upload fails.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` for upload failures, or its `Storage` variant if
    /// the link write fails after a successful upload.
    pub async fn upload_and_link(
        &self,
        uploader: &VideoUploader,
        program_id: &ProgramId,
        module_id: ModuleId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let url = uploader.upload(program_id, module_id, filename, bytes).await?;
        self.custom.set(program_id, module_id, &url).await?;
        tracing::info!(program = %program_id, module = %module_id, %url, "custom video linked");
        Ok(url)
    }
}
