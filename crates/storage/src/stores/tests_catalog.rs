use std::sync::Arc;

use portal_core::model::{TestId, TestMeta};

use super::{read_json_or_default, write_json};
use crate::kv::{KeyValueStore, StorageError};

/// Namespace key holding the authored test catalog.
pub const TESTS_CATALOG_KEY: &str = "tests_catalog";

/// Authored tests as the authoring flow persists them.
///
/// The taking flow reads from here; `save` keeps the authoring side's
/// upsert-by-id behavior.
#[derive(Clone)]
pub struct TestsCatalogStore {
    kv: Arc<dyn KeyValueStore>,
}

impl TestsCatalogStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All authored tests in persisted order.
    pub async fn list(&self) -> Vec<TestMeta> {
        read_json_or_default(self.kv.as_ref(), TESTS_CATALOG_KEY).await
    }

    /// One test by id.
    pub async fn get(&self, test_id: &TestId) -> Option<TestMeta> {
        self.list().await.into_iter().find(|t| &t.id == test_id)
    }

    /// Inserts or replaces a test by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn save(&self, test: &TestMeta) -> Result<(), StorageError> {
        let mut tests = self.list().await;
        match tests.iter_mut().find(|t| t.id == test.id) {
            Some(existing) => *existing = test.clone(),
            None => tests.push(test.clone()),
        }
        write_json(self.kv.as_ref(), TESTS_CATALOG_KEY, &tests).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;
    use portal_core::model::sample_work_at_height_test;

    #[tokio::test]
    async fn save_then_get_by_id() {
        let store = TestsCatalogStore::new(Arc::new(InMemoryStore::new()));
        let test = sample_work_at_height_test();

        store.save(&test).await.unwrap();
        let got = store.get(&test.id).await.unwrap();
        assert_eq!(got.title, "Работа на высоте");
    }

    #[tokio::test]
    async fn save_replaces_by_id() {
        let store = TestsCatalogStore::new(Arc::new(InMemoryStore::new()));
        let mut test = sample_work_at_height_test();
        store.save(&test).await.unwrap();

        test.title = "Работа на высоте (обновлено)".into();
        store.save(&test).await.unwrap();

        let tests = store.list().await;
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].title, "Работа на высоте (обновлено)");
    }
}
