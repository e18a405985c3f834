use std::collections::BTreeMap;
use std::sync::Arc;

use portal_core::model::{ModuleId, ProgramId};
use url::Url;

use super::{read_json_or_default, write_json};
use crate::kv::{KeyValueStore, StorageError};

/// Namespace key holding the `{programId}_{moduleId}` → video URL map.
pub const CUSTOM_VIDEOS_KEY: &str = "custom_videos";

fn map_key(program_id: &ProgramId, module_id: ModuleId) -> String {
    format!("{program_id}_{module_id}")
}

/// Admin-uploaded video links per program module.
#[derive(Clone)]
pub struct CustomVideoStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CustomVideoStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn map(&self) -> BTreeMap<String, String> {
        read_json_or_default(self.kv.as_ref(), CUSTOM_VIDEOS_KEY).await
    }

    /// Custom video URL for a module, if one was linked.
    pub async fn get(&self, program_id: &ProgramId, module_id: ModuleId) -> Option<String> {
        self.map().await.remove(&map_key(program_id, module_id))
    }

    /// Links a video URL to a module, replacing any previous link.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` for a value that does not parse as
    /// a URL, or a backend error if the write fails.
    pub async fn set(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
        video_url: &str,
    ) -> Result<(), StorageError> {
        Url::parse(video_url).map_err(|_| StorageError::InvalidUrl(video_url.to_owned()))?;

        let mut map = self.map().await;
        map.insert(map_key(program_id, module_id), video_url.to_owned());
        write_json(self.kv.as_ref(), CUSTOM_VIDEOS_KEY, &map).await
    }

    /// Unlinks the module's custom video.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn remove(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
    ) -> Result<(), StorageError> {
        let mut map = self.map().await;
        map.remove(&map_key(program_id, module_id));
        write_json(self.kv.as_ref(), CUSTOM_VIDEOS_KEY, &map).await
    }

    /// Every linked video, keyed `{programId}_{moduleId}`.
    pub async fn all(&self) -> BTreeMap<String, String> {
        self.map().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;

    fn build_store() -> CustomVideoStore {
        CustomVideoStore::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn set_get_remove_roundtrip() {
        let store = build_store();
        let program = ProgramId::new("p1");

        store
            .set(&program, ModuleId::new(2), "https://cdn.example/v.mp4")
            .await
            .unwrap();
        assert_eq!(
            store.get(&program, ModuleId::new(2)).await.as_deref(),
            Some("https://cdn.example/v.mp4")
        );

        store.remove(&program, ModuleId::new(2)).await.unwrap();
        assert!(store.get(&program, ModuleId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn rejects_unparseable_url() {
        let store = build_store();
        let err = store
            .set(&ProgramId::new("p1"), ModuleId::new(0), "not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn all_lists_every_link() {
        let store = build_store();
        store
            .set(&ProgramId::new("p1"), ModuleId::new(0), "https://a/v0.mp4")
            .await
            .unwrap();
        store
            .set(&ProgramId::new("p2"), ModuleId::new(1), "https://a/v1.mp4")
            .await
            .unwrap();

        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert!(all.contains_key("p1_0"));
        assert!(all.contains_key("p2_1"));
    }
}
