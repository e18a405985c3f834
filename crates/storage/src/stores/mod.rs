use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::kv::{InMemoryStore, KeyValueStore, StorageError};
use crate::sqlite::{SqliteInitError, SqliteStore};

mod custom_videos;
mod module_progress;
mod protocol_registry;
mod tests_catalog;
mod video_progress;

pub use custom_videos::{CUSTOM_VIDEOS_KEY, CustomVideoStore};
pub use module_progress::ModuleProgressStore;
pub use protocol_registry::{PROTOCOL_REGISTRY_KEY, ProtocolRegistryStore};
pub use tests_catalog::{TESTS_CATALOG_KEY, TestsCatalogStore};
pub use video_progress::{VIDEO_PROGRESS_KEY, VideoProgressStore};

/// Reads a JSON collection from the port, treating absent or malformed data
/// as "no data".
///
/// A store read never fails past this boundary: a backend error or an entry
/// that does not parse is logged and the caller sees the default (empty)
/// value.
pub(crate) async fn read_json_or_default<T>(kv: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match kv.get(key).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(key, %err, "storage read failed, treating as empty");
            return T::default();
        }
    };
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, %err, "malformed persisted data, treating as empty");
            T::default()
        }
    }
}

/// Serializes and writes a whole collection back under its namespace key.
pub(crate) async fn write_json<T>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    kv.set(key, &raw).await
}

/// Aggregates the typed stores behind one injected backend.
#[derive(Clone)]
pub struct Storage {
    pub protocols: ProtocolRegistryStore,
    pub module_progress: ModuleProgressStore,
    pub video_progress: VideoProgressStore,
    pub custom_videos: CustomVideoStore,
    pub tests: TestsCatalogStore,
}

impl Storage {
    /// Builds the typed stores over any key-value backend.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            protocols: ProtocolRegistryStore::new(Arc::clone(&kv)),
            module_progress: ModuleProgressStore::new(Arc::clone(&kv)),
            video_progress: VideoProgressStore::new(Arc::clone(&kv)),
            custom_videos: CustomVideoStore::new(Arc::clone(&kv)),
            tests: TestsCatalogStore::new(kv),
        }
    }

    /// Builds a `Storage` over an in-memory backend, for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Builds a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteStore::connect(database_url).await?;
        store.migrate().await?;
        Ok(Self::new(Arc::new(store)))
    }
}
