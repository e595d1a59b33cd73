//! Persistent key-value storage collaborator.
//!
//! Plugins persist whole maps under fixed keys: one `load` at startup, one
//! full `save` on every change. There is no locking between processes, so
//! two bots sharing a data directory overwrite each other (last write wins).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{PluginError, PluginResult};

/// Whole-value storage keyed by name.
pub trait DataStore: Send + Sync {
    /// Loads the value stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> PluginResult<Option<Value>>;

    /// Replaces the value stored under `key`.
    fn save(&self, key: &str, value: &Value) -> PluginResult<()>;
}

/// Loads a string-keyed map, treating a missing or `null` value as empty.
pub fn load_map<T: DeserializeOwned>(
    store: &dyn DataStore,
    key: &str,
) -> PluginResult<BTreeMap<String, T>> {
    match store.load(key)? {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Saves a string-keyed map.
pub fn save_map<T: Serialize>(
    store: &dyn DataStore,
    key: &str,
    map: &BTreeMap<String, T>,
) -> PluginResult<()> {
    store.save(key, &serde_json::to_value(map)?)
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DataStore for JsonFileStore {
    fn load(&self, key: &str) -> PluginResult<Option<Value>> {
        let path = self.path_for(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "No stored data");
                return Ok(None);
            }
            Err(e) => {
                return Err(PluginError::storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                ))
                .with_source(e));
            }
        };
        debug!(path = %path.display(), "Loaded stored data");
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, key: &str, value: &Value) -> PluginResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json).map_err(|e| {
            PluginError::storage(format!("failed to write {}: {}", path.display(), e))
                .with_source(e)
        })?;
        debug!(path = %path.display(), "Saved data");
        Ok(())
    }
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for MemoryStore {
    fn load(&self, key: &str) -> PluginResult<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| PluginError::internal("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> PluginResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| PluginError::internal("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("schema_id").unwrap().is_none());
    }

    #[test]
    fn file_store_saves_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        store
            .save("schema_id", &json!({"y1a": 42, "lab": "http://x/y.ics"}))
            .unwrap();

        assert!(store.path_for("schema_id").exists());
        let value = store.load("schema_id").unwrap().unwrap();
        assert_eq!(value["y1a"], 42);
        assert_eq!(value["lab"], "http://x/y.ics");
    }

    #[test]
    fn file_store_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for("schema_fav"), "{not json").unwrap();
        let err = store.load("schema_fav").unwrap_err();
        assert_eq!(err.code(), crate::error::PluginErrorCode::StorageError);
    }

    #[test]
    fn load_map_treats_null_as_empty() {
        let store = MemoryStore::new();
        store.save("k", &Value::Null).unwrap();
        let map: BTreeMap<String, String> = load_map(&store, "k").unwrap();
        assert!(map.is_empty());
        let map: BTreeMap<String, String> = load_map(&store, "missing").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn map_round_trip_through_memory_store() {
        let store = MemoryStore::new();
        let mut map = BTreeMap::new();
        map.insert("serp".to_string(), "y1a".to_string());
        save_map(&store, "schema_fav", &map).unwrap();
        let loaded: BTreeMap<String, String> = load_map(&store, "schema_fav").unwrap();
        assert_eq!(loaded, map);
    }
}
