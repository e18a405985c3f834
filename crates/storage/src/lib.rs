#![forbid(unsafe_code)]

pub mod kv;
pub mod sqlite;
pub mod stores;

pub use kv::{InMemoryStore, KeyValueStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
pub use stores::{
    CustomVideoStore, ModuleProgressStore, ProtocolRegistryStore, Storage, TestsCatalogStore,
    VideoProgressStore,
};
