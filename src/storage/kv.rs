// src/storage/kv.rs
// =============================================================================
// A tiny persistent key-value store: string keys, string values.
//
// Failure policy: the store NEVER reports errors to its callers. Every I/O or
// parse failure is logged at warn level and then treated like a missing
// value (for reads) or a no-op (for writes). Callers can't tell "not set"
// apart from "couldn't read".
//
// FileStore keeps everything in one JSON object on disk:
//
//   { "@theme_mode": "dark", "@is_authenticated": "true", "@user": "{...}" }
//
// Each write reads the file, changes one key and writes it back. A mutex
// keeps two writes from the same process from interleaving.
// =============================================================================

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Async get/set/remove of small string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);
    async fn remove(&self, key: &str);
}

type Entries = BTreeMap<String, String>;

pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Stores values in `<dir>/storage.json`. The directory is created on the
    /// first write.
    pub fn new(dir: &Path) -> Self {
        FileStore {
            path: dir.join(STORAGE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn try_update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let _guard = self.lock.lock().await;
        // A corrupt file is replaced rather than blocking every future write
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(StorageError::Serde(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt storage file");
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        change(&mut entries);
        self.save(&entries).await
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        match self.load().await {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) {
        let owned_key = key.to_string();
        let owned_value = value.to_string();
        match self.try_update(move |entries| {
            entries.insert(owned_key, owned_value);
        })
        .await
        {
            Ok(()) => debug!(key, "stored value"),
            Err(e) => warn!(key, error = %e, "failed to store value"),
        }
    }

    async fn remove(&self, key: &str) {
        let owned_key = key.to_string();
        match self.try_update(move |entries| {
            entries.remove(&owned_key);
        })
        .await
        {
            Ok(()) => debug!(key, "removed value"),
            Err(e) => warn!(key, error = %e, "failed to remove value"),
        }
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<Entries>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn snapshot(&self) -> Entries {
        self.entries.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why do get/set/remove return no Result?
//    - Preferences and the saved session are nice to have, never required
//    - A broken disk should not stop someone from browsing repositories
//    - Failures still show up in the log at the default --log-level warn
//
// 2. Why is StorageError still a thiserror enum then?
//    - load()/save() use `?` internally and need a real error type
//    - The trait methods are the one place the error is logged and dropped
//
// 3. Why tokio::sync::Mutex instead of std::sync::Mutex?
//    - The lock is held across an .await (read file, then write it back)
//    - A std mutex guard must not be held across an await point
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("@theme_mode").await, None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(&dir.path().join("nested"));

        store.set("@theme_mode", "dark").await;
        store.set("language", "en").await;
        assert_eq!(store.get("@theme_mode").await.as_deref(), Some("dark"));

        store.remove("@theme_mode").await;
        assert_eq!(store.get("@theme_mode").await, None);
        assert_eq!(store.get("language").await.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("@is_authenticated", "true").await;

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("@is_authenticated").await.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_missing_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.get("@theme_mode").await, None);

        store.set("@theme_mode", "light").await;
        assert_eq!(store.get("@theme_mode").await.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be makes every write fail
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let store = FileStore::new(&blocker);

        store.set("@theme_mode", "dark").await;
        store.remove("@theme_mode").await;
        assert_eq!(store.get("@theme_mode").await, None);
    }
}
