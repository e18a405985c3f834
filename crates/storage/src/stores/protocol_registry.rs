use std::sync::Arc;

use portal_core::model::{ProtocolId, ProtocolRecord};

use super::{read_json_or_default, write_json};
use crate::kv::{KeyValueStore, StorageError};

/// Namespace key holding the full list of protocol records.
pub const PROTOCOL_REGISTRY_KEY: &str = "protocol_registry";

/// Append/list/delete over the persisted protocol registry.
///
/// Each mutation rewrites the whole list under one key; concurrent writers
/// lose (last write wins), which is accepted for a single-operator tool.
#[derive(Clone)]
pub struct ProtocolRegistryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProtocolRegistryStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All records in persisted (insertion) order. Absent or malformed data
    /// reads as an empty registry, never an error.
    pub async fn list(&self) -> Vec<ProtocolRecord> {
        read_json_or_default(self.kv.as_ref(), PROTOCOL_REGISTRY_KEY).await
    }

    /// Appends one record to the registry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn append(&self, record: &ProtocolRecord) -> Result<(), StorageError> {
        let mut records = self.list().await;
        records.push(record.clone());
        write_json(self.kv.as_ref(), PROTOCOL_REGISTRY_KEY, &records).await?;
        tracing::debug!(protocol = %record.protocol_number(), "protocol appended to registry");
        Ok(())
    }

    /// Removes the record with the given id, if present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn remove(&self, id: &ProtocolId) -> Result<(), StorageError> {
        let records = self.list().await;
        let remaining: Vec<ProtocolRecord> =
            records.into_iter().filter(|r| r.id() != id).collect();
        write_json(self.kv.as_ref(), PROTOCOL_REGISTRY_KEY, &remaining).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;
    use portal_core::model::{SessionResult, TestId};
    use portal_core::time::fixed_now;

    fn build_record(number: &str) -> ProtocolRecord {
        ProtocolRecord::from_result(
            ProtocolId::generate(),
            number,
            TestId::new("work-at-height"),
            "Работа на высоте",
            Some("Иванов Иван".into()),
            None,
            SessionResult {
                correct: 3,
                total: 3,
            },
            fixed_now(),
        )
    }

    fn build_store() -> (ProtocolRegistryStore, Arc<InMemoryStore>) {
        let kv = Arc::new(InMemoryStore::new());
        (ProtocolRegistryStore::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn append_then_list_contains_record() {
        let (store, _) = build_store();
        let record = build_record("№ 1");

        store.append(&record).await.unwrap();
        let listed = store.list().await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn remove_filters_by_id() {
        let (store, _) = build_store();
        let keep = build_record("№ 1");
        let drop = build_record("№ 2");
        store.append(&keep).await.unwrap();
        store.append(&drop).await.unwrap();

        store.remove(drop.id()).await.unwrap();
        let listed = store.list().await;
        assert_eq!(listed, vec![keep]);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let (store, _) = build_store();
        let first = build_record("№ 1");
        let second = build_record("№ 2");
        store.append(&first).await.unwrap();
        store.append(&second).await.unwrap();

        let listed = store.list().await;
        assert_eq!(listed[0].protocol_number(), "№ 1");
        assert_eq!(listed[1].protocol_number(), "№ 2");
    }

    #[tokio::test]
    async fn malformed_registry_reads_as_empty() {
        let (store, kv) = build_store();
        kv.set(PROTOCOL_REGISTRY_KEY, "{not json").await.unwrap();
        assert!(store.list().await.is_empty());
    }
}
