//! Durable key-value storage backing all persisted client state.
//!
//! The store holds opaque string values addressed by string keys and
//! survives application restarts. Typed accessors (`SessionStore`,
//! `OfflineQueue`, `SearchHistory`, `AppSettings`) serialize on every
//! call, so every read reflects the latest persisted write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Logical keys for every value this crate persists.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_DATA: &str = "user_data";
    pub const SEARCH_HISTORY: &str = "search_history";
    pub const OFFLINE_PAYMENTS: &str = "offline_payments";
    pub const APP_SETTINGS: &str = "app_settings";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed persisted record at '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn malformed(key: &str, source: serde_json::Error) -> Self {
        StoreError::Malformed {
            key: key.to_string(),
            source,
        }
    }
}

/// Process-wide persistent string storage.
///
/// All mutation is whole-value replace; there is no append primitive and
/// no transaction. Concurrent read-modify-write sequences against the same
/// key are subject to a lost-update race, which callers accept or
/// serialize around themselves.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// File-backed store: one file per key under a single directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "writing store entry");
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and previews. Never touches disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_many() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove_many(&["a", "b", "missing"]).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("auth_token").unwrap(), None);
        store.set("auth_token", "abc123").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("abc123"));

        store.set("auth_token", "def456").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("def456"));

        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
        // Removing an absent key is a no-op
        store.remove("auth_token").unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            store.set("app_settings", "{\"theme\":\"dark\"}").unwrap();
        }
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            store.get("app_settings").unwrap().as_deref(),
            Some("{\"theme\":\"dark\"}")
        );
    }
}
