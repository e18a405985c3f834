use std::sync::Arc;

use portal_core::Clock;
use storage::Storage;

use crate::ai_generator::AiGenerator;
use crate::api_client::PortalApi;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::registry::RegistryService;
use crate::testing_service::TestingService;
use crate::video_service::VideoService;
use crate::video_uploader::VideoUploader;

/// Everything the front end talks to, wired over one storage backend.
///
/// Cloning is cheap; the services inside share the backend through `Arc`s.
#[derive(Clone)]
pub struct AppServices {
    testing: Arc<TestingService>,
    registry: Arc<RegistryService>,
    progress: Arc<ProgressService>,
    videos: Arc<VideoService>,
    api: Arc<PortalApi>,
    generator: Arc<AiGenerator>,
    uploader: Arc<VideoUploader>,
}

impl AppServices {
    /// Wires the services over an existing storage aggregate; remote clients
    /// are configured from the environment.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        Self {
            testing: Arc::new(TestingService::new(
                clock,
                storage.tests.clone(),
                storage.protocols.clone(),
            )),
            registry: Arc::new(RegistryService::new(clock, storage.protocols.clone())),
            progress: Arc::new(ProgressService::new(clock, storage.module_progress.clone())),
            videos: Arc::new(VideoService::new(
                clock,
                storage.video_progress.clone(),
                storage.custom_videos.clone(),
            )),
            api: Arc::new(PortalApi::from_env()),
            generator: Arc::new(AiGenerator::from_env()),
            uploader: Arc::new(VideoUploader::from_env()),
        }
    }

    /// Opens (and migrates) the `SQLite` database, then wires the services.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or
    /// migrated.
    pub async fn new_sqlite(database_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        Ok(Self::new(&storage, clock))
    }

    /// In-memory wiring, for tests.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn testing(&self) -> &Arc<TestingService> {
        &self.testing
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<RegistryService> {
        &self.registry
    }

    #[must_use]
    pub fn progress(&self) -> &Arc<ProgressService> {
        &self.progress
    }

    #[must_use]
    pub fn videos(&self) -> &Arc<VideoService> {
        &self.videos
    }

    #[must_use]
    pub fn api(&self) -> &Arc<PortalApi> {
        &self.api
    }

    #[must_use]
    pub fn generator(&self) -> &Arc<AiGenerator> {
        &self.generator
    }

    #[must_use]
    pub fn uploader(&self) -> &Arc<VideoUploader> {
        &self.uploader
    }
}
