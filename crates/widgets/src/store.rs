//! Durable key-value store.
//!
//! Widget settings, OAuth tokens and cache entries all live in one flat
//! key-value store of JSON values. Three implementations are provided:
//!
//! - [`MemoryStore`]: a process-local map, used in tests and as a fallback
//! - [`FileStore`]: a JSON file written atomically (temp file + rename)
//! - [`LocalStore`]: a [`FileStore`] that degrades to a [`MemoryStore`]
//!   when the file cannot be opened or written
//!
//! # File Layout
//!
//! ```text
//! ~/.local/share/newtab/
//! ├── store.json        # { "weather.settings": {...}, "weather.cache": {...}, ... }
//! └── store.json.tmp    # only present while a write is in flight
//! ```

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// An asynchronous key-value store of JSON values.
///
/// Writes from different widgets never touch the same key, so no
/// cross-key coordination is needed; the last write to a key wins.
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Returns the value under `key` decoded as `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value does not decode.
    fn get_as<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>>> + Send {
        async move {
            match self.get(key).await? {
                Some(value) => Ok(Some(serde_json::from_value(value)?)),
                None => Ok(None),
            }
        }
    }

    /// Encodes `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not encode or the store fails.
    fn set_as<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            let value = serde_json::to_value(value)?;
            self.set(key, value).await
        }
    }
}

/// An in-memory store. Clones share the same map.
///
/// # Examples
///
/// ```
/// use newtab_widgets::{KvStore, MemoryStore};
///
/// # async fn example() -> newtab_widgets::Result<()> {
/// let store = MemoryStore::new();
/// store.set_as("greeting", &"hello").await?;
/// let value: Option<String> = store.get_as("greeting").await?;
/// assert_eq!(value.as_deref(), Some("hello"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

/// A store persisted as a single JSON object on disk.
///
/// Every write serializes the whole map to `<path>.tmp` and renames it over
/// the main file, so a crash leaves either the old or the new content. On
/// open, a corrupt main file falls back to the temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    data: Arc<Mutex<HashMap<String, Value>>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    #[instrument]
    pub async fn open(path: impl Into<PathBuf> + std::fmt::Debug) -> Result<Self> {
        let path = path.into();
        let data = read_with_tmp_fallback(&path).await?;
        debug!(?path, keys = data.len(), "opened file store");
        Ok(Self {
            path: Arc::new(path),
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &HashMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}

impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(path = ?self.path))]
    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;
        *data = next;
        debug!("stored value");
        Ok(())
    }

    #[instrument(skip(self), fields(path = ?self.path))]
    async fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if !data.contains_key(key) {
            return Ok(());
        }
        let mut next = data.clone();
        next.remove(key);
        self.persist(&next).await?;
        *data = next;
        debug!("removed value");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn read_with_tmp_fallback(path: &Path) -> Result<HashMap<String, Value>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(data) => Ok(data),
        Err(e) => {
            let tmp = tmp_path(path);
            warn!(error = %e, path = %path.display(), "failed to parse store, trying tmp fallback");
            match tokio::fs::read(&tmp).await {
                Ok(tmp_bytes) => Ok(serde_json::from_slice(&tmp_bytes).unwrap_or_default()),
                Err(_) => Ok(HashMap::new()),
            }
        }
    }
}

/// The store used by the application.
///
/// Reads and writes go to the file store when it is available. When the
/// file cannot be opened, or a write to it fails, the value is kept in
/// memory instead so the dashboard keeps working for the session. A key
/// whose removal could not reach the file stays removed until it is set
/// again.
#[derive(Debug, Clone)]
pub struct LocalStore {
    primary: Option<FileStore>,
    fallback: MemoryStore,
    removed: Arc<RwLock<HashSet<String>>>,
}

impl LocalStore {
    /// Opens the file store at `path`, degrading to memory on failure.
    pub async fn open(path: impl Into<PathBuf> + std::fmt::Debug) -> Self {
        match FileStore::open(path).await {
            Ok(primary) => Self {
                primary: Some(primary),
                fallback: MemoryStore::new(),
                removed: Arc::default(),
            },
            Err(e) => {
                warn!(error = %e, "file store unavailable, using memory store");
                Self::in_memory()
            }
        }
    }

    /// Creates a store without a file backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            primary: None,
            fallback: MemoryStore::new(),
            removed: Arc::default(),
        }
    }

    /// Returns `true` if values are persisted to disk.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.primary.is_some()
    }
}

impl KvStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        // Values that could not be written to disk shadow the file.
        if let Some(value) = self.fallback.get(key).await? {
            return Ok(Some(value));
        }
        if self.removed.read().await.contains(key) {
            return Ok(None);
        }
        match &self.primary {
            Some(primary) => primary.get(key).await,
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.removed.write().await.remove(key);
        if let Some(primary) = &self.primary {
            match primary.set(key, value.clone()).await {
                Ok(()) => return self.fallback.remove(key).await,
                Err(e) => warn!(key, error = %e, "store write failed, keeping value in memory"),
            }
        }
        self.fallback.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.fallback.remove(key).await?;
        if let Some(primary) = &self.primary {
            if let Err(e) = primary.remove(key).await {
                warn!(key, error = %e, "store remove failed, hiding key for this session");
                self.removed.write().await.insert(key.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set_as("weather.settings", &json!({"api_key": "k"})).await.unwrap();
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());

        let reopened = FileStore::open(&path).await.unwrap();
        let value: Option<Value> = reopened.get_as("weather.settings").await.unwrap();
        assert_eq!(value, Some(json!({"api_key": "k"})));
    }

    #[tokio::test]
    async fn file_store_remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();
        store.remove("a").await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("a").await.unwrap(), None);
        assert_eq!(reopened.get("b").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();
        std::fs::write(tmp_path(&path), br#"{"mail.token": "t"}"#).unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("mail.token").await.unwrap(), Some(json!("t")));
    }

    #[tokio::test]
    async fn corrupt_file_without_tmp_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"garbage").unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn local_store_falls_back_to_memory() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let store = LocalStore::open(dir.path()).await;
        assert!(!store.is_durable());

        store.set("k", json!("v")).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn local_store_keeps_value_when_write_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = LocalStore::open(&path).await;
        assert!(store.is_durable());

        // Renaming the temp file over a directory fails.
        std::fs::create_dir(&path).unwrap();

        store.set("k", json!(42)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(42)));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_remove_hides_file_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = LocalStore::open(&path).await;
        store.set("weather.cache", json!("pre-save")).await.unwrap();

        // The file becomes unwritable after the value reached it.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        store.remove("weather.cache").await.unwrap();
        assert_eq!(store.get("weather.cache").await.unwrap(), None);

        store.set("weather.cache", json!("fresh")).await.unwrap();
        assert_eq!(store.get("weather.cache").await.unwrap(), Some(json!("fresh")));
    }

    #[tokio::test]
    async fn get_as_reports_decode_errors() {
        let store = MemoryStore::new();
        store.set("n", json!("not a number")).await.unwrap();
        let result: Result<Option<u32>> = store.get_as("n").await;
        assert!(result.is_err());
    }
}
