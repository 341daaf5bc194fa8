//! Persistent key-value storage.
//!
//! [`KeyValueStorage`] is a string-to-string store in the shape of browser
//! local storage. [`Storage`] layers JSON values and the auth token helpers
//! on top of any backend.
//!
//! # Backends
//!
//! - [`MemoryStorage`]: process-local, for tests and throwaway sessions
//! - [`FileStorage`]: one JSON object file on disk, for the CLI session
//!
//! All access is last-write-wins; each call takes the backend's lock for its
//! own duration only.

use crate::constants::storage_keys;
use crate::error::StorageError;
use crate::utils::extract_token;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// String key-value storage backend.
pub trait KeyValueStorage: Send + Sync + 'static {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn clear(&self) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════
// Backends
// ═══════════════════════════════════════════════════════════

/// In-memory storage.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries (for testing).
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// Storage persisted as a JSON object file.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written file behind. A missing file
/// reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    /// Use the file at `path`; it is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(BTreeMap::clear)
    }
}

// ═══════════════════════════════════════════════════════════
// JSON adapter
// ═══════════════════════════════════════════════════════════

/// JSON value adapter over a [`KeyValueStorage`] backend.
///
/// # Example
///
/// ```
/// use storefront::storage::{MemoryStorage, Storage};
///
/// let storage = Storage::new(MemoryStorage::new());
/// storage.save_token("abc").unwrap();
/// assert_eq!(storage.load_token().unwrap().as_deref(), Some("abc"));
///
/// storage.clear_token().unwrap();
/// assert_eq!(storage.load_token().unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Storage<B> {
    backend: B,
}

impl<B: KeyValueStorage> Storage<B> {
    /// Wrap a backend.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Serialize `value` as JSON under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization or the backend fails.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.set_item(key, &json)
    }

    /// Parse the JSON value under `key`; `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails or the value is not
    /// valid JSON for `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.backend
            .get_item(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove_item(key)
    }

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()
    }

    /// Persist the auth token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.set(storage_keys::TOKEN, token)
    }

    /// Read the persisted auth token.
    ///
    /// Accepts a JSON string or a raw string left by another writer, and
    /// strips an authorization scheme (`"Bearer abc"` yields `"abc"`). Empty
    /// and `null` values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn load_token(&self) -> Result<Option<String>> {
        let Some(raw) = self.backend.get_item(storage_keys::TOKEN)? else {
            return Ok(None);
        };

        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::String(token)) => token,
            Ok(serde_json::Value::Null) => return Ok(None),
            Ok(_) | Err(_) => raw,
        };

        Ok(extract_token(&value).map(str::to_string).filter(|t| !t.is_empty()))
    }

    /// Forget the auth token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn clear_token(&self) -> Result<()> {
        self.remove(storage_keys::TOKEN)
    }
}
