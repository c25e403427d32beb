mod file;
mod medium;

pub use file::FileMedium;
pub use medium::{MediumError, MemoryMedium, StorageMedium};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamlist_config::{PathManager, StorageConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Persistent store keys
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const SEARCH_HISTORY: &str = "searchHistory";
    pub const RECENTLY_VIEWED: &str = "recentlyViewed";
    /// Lowest priority namespace; evicted first when the medium is full
    pub const USER_EVENTS: &str = "userEvents";
    pub const WATCHLIST_ITEMS: &str = "streamList_items";
    pub const WATCHLIST_FILTERS: &str = "streamList_filters";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    #[error("stored value for {key} is corrupted: {reason}")]
    Corrupted { key: String, reason: String },

    #[error("failed to serialize value for {key}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage I/O failed for {key}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn from_medium(key: &str, err: MediumError) -> Self {
        match err {
            MediumError::QuotaExceeded => StoreError::QuotaExceeded { key: key.to_string() },
            MediumError::Io(source) => StoreError::Io { key: key.to_string(), source },
        }
    }
}

/// JSON key/value store over an injected [`StorageMedium`].
///
/// Writers to the same key are serialized by a per-key lock. Reads never
/// fail: a missing or unreadable value degrades to the caller's default.
pub struct Store {
    medium: Arc<dyn StorageMedium>,
    namespaces: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Store {
    pub fn new(medium: Arc<dyn StorageMedium>) -> Self {
        Self {
            medium,
            namespaces: Mutex::new(HashMap::new()),
        }
    }

    /// Unbounded in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryMedium::new()))
    }

    /// File-backed store rooted at `dir`
    pub fn open_dir(dir: &Path, quota_bytes: u64) -> Result<Self, StoreError> {
        let medium = FileMedium::open(dir, quota_bytes).map_err(|e| StoreError::from_medium("<root>", e))?;
        info!("Opened store at {:?} (quota {} bytes)", dir, quota_bytes);
        Ok(Self::new(Arc::new(medium)))
    }

    /// File-backed store in the configured store directory and quota
    pub fn open_from(paths: &PathManager, storage: &StorageConfig) -> Result<Self, StoreError> {
        Self::open_dir(&paths.store_dir(), storage.quota_bytes)
    }

    fn namespace(&self, key: &str) -> Arc<Mutex<()>> {
        let mut namespaces = self.namespaces.lock().unwrap_or_else(PoisonError::into_inner);
        namespaces
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn lock_namespace(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read `key`, falling back to `default` when absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_raw(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!("{}; using default", e);
                default
            }
        }
    }

    fn read_raw<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = match self.medium.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => return Err(StoreError::from_medium(key, e)),
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| StoreError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let lock = self.namespace(key);
        let _guard = Self::lock_namespace(&lock);
        self.write_locked(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let lock = self.namespace(key);
        let _guard = Self::lock_namespace(&lock);
        self.medium.remove(key).map_err(|e| StoreError::from_medium(key, e))
    }

    /// Read-modify-write `key` as one critical section.
    ///
    /// `f` sees the current value (or `default`) and its return value is
    /// handed back once the write has succeeded.
    pub fn update<T, R, F>(&self, key: &str, default: T, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> R,
    {
        let lock = self.namespace(key);
        let _guard = Self::lock_namespace(&lock);

        let mut value = self.read(key, default);
        let result = f(&mut value);
        self.write_locked(key, &value)?;
        Ok(result)
    }

    /// Caller holds the namespace lock for `key`
    fn write_locked<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;

        match self.medium.set(key, &raw) {
            Ok(()) => return Ok(()),
            Err(MediumError::QuotaExceeded) => {
                warn!("Quota exceeded writing {}; evicting {} and retrying", key, keys::USER_EVENTS);
            }
            Err(e) => return Err(StoreError::from_medium(key, e)),
        }

        self.evict_events(key)?;

        self.medium.set(key, &raw).map_err(|e| {
            warn!("Retry after eviction failed for {}: {}", key, e);
            StoreError::from_medium(key, e)
        })
    }

    fn evict_events(&self, writing_key: &str) -> Result<(), StoreError> {
        let evict = || {
            self.medium
                .remove(keys::USER_EVENTS)
                .map_err(|e| StoreError::from_medium(keys::USER_EVENTS, e))
        };

        if writing_key == keys::USER_EVENTS {
            evict()?;
        } else {
            let lock = self.namespace(keys::USER_EVENTS);
            let _guard = Self::lock_namespace(&lock);
            evict()?;
        }
        debug!("Evicted {} to make room for {}", keys::USER_EVENTS, writing_key);
        Ok(())
    }

    /// Whether the medium answers at all
    pub fn is_available(&self) -> bool {
        self.medium.keys().is_ok()
    }

    /// Remove every key
    pub fn clear(&self) -> Result<(), StoreError> {
        let all = self.medium.keys().map_err(|e| StoreError::from_medium("<root>", e))?;
        for key in all {
            self.remove(&key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Rejects the next `reject` writes with QuotaExceeded, then delegates
    struct RejectingMedium {
        inner: MemoryMedium,
        reject: AtomicUsize,
        removed: Mutex<Vec<String>>,
    }

    impl RejectingMedium {
        fn new(reject: usize) -> Self {
            Self {
                inner: MemoryMedium::new(),
                reject: AtomicUsize::new(reject),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    impl StorageMedium for RejectingMedium {
        fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
            let rejected = self
                .reject
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if rejected {
                return Err(MediumError::QuotaExceeded);
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), MediumError> {
            self.removed.lock().unwrap().push(key.to_string());
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, MediumError> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_read_missing_returns_default() {
        let store = Store::in_memory();
        let value: Vec<u64> = store.read(keys::FAVORITES, vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_corrupted_value_degrades_to_default() {
        let medium = Arc::new(MemoryMedium::new());
        medium.set(keys::FAVORITES, "{not json").unwrap();
        let store = Store::new(medium);

        let value: Vec<u64> = store.read(keys::FAVORITES, Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_update_returns_closure_result() {
        let store = Store::in_memory();
        store.write(keys::SEARCH_HISTORY, &vec!["dune".to_string()]).unwrap();

        let len = store
            .update(keys::SEARCH_HISTORY, Vec::<String>::new(), |terms| {
                terms.push("alien".to_string());
                terms.len()
            })
            .unwrap();

        assert_eq!(len, 2);
        let terms: Vec<String> = store.read(keys::SEARCH_HISTORY, Vec::new());
        assert_eq!(terms, vec!["dune", "alien"]);
    }

    #[test]
    fn test_quota_evicts_events_then_retries() {
        let medium = Arc::new(RejectingMedium::new(1));
        let store = Store::new(medium.clone());
        medium.inner.set(keys::USER_EVENTS, "[1,2,3]").unwrap();

        store.write(keys::FAVORITES, &vec![42]).unwrap();

        assert_eq!(*medium.removed.lock().unwrap(), vec![keys::USER_EVENTS.to_string()]);
        let favorites: Vec<u64> = store.read(keys::FAVORITES, Vec::new());
        assert_eq!(favorites, vec![42]);
        assert_eq!(medium.inner.get(keys::USER_EVENTS).unwrap(), None);
    }

    #[test]
    fn test_events_writer_evicts_its_own_namespace() {
        let medium = Arc::new(RejectingMedium::new(1));
        let store = Store::new(medium.clone());

        store.write(keys::USER_EVENTS, &vec![1, 2, 3]).unwrap();

        let events: Vec<u32> = store.read(keys::USER_EVENTS, Vec::new());
        assert_eq!(events, vec![1, 2, 3]);
    }

    #[test]
    fn test_quota_error_after_failed_retry() {
        let medium = Arc::new(RejectingMedium::new(2));
        let store = Store::new(medium.clone());

        let err = store.write(keys::FAVORITES, &vec![42]).unwrap_err();

        assert!(matches!(err, StoreError::QuotaExceeded { ref key } if key == keys::FAVORITES));
        assert_eq!(medium.removed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_quota_recovers_by_dropping_events() {
        let medium = Arc::new(MemoryMedium::with_quota(64));
        let store = Store::new(medium.clone());
        store.write(keys::USER_EVENTS, &"x".repeat(40)).unwrap();

        store.write(keys::FAVORITES, &"y".repeat(20)).unwrap();

        assert_eq!(medium.get(keys::USER_EVENTS).unwrap(), None);
        assert!(medium.get(keys::FAVORITES).unwrap().is_some());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        {
            let store = Store::open_dir(dir.path(), 4096).unwrap();
            store.write(keys::FAVORITES, &vec![1u64, 2]).unwrap();
        }
        let store = Store::open_dir(dir.path(), 4096).unwrap();
        let favorites: Vec<u64> = store.read(keys::FAVORITES, Vec::new());
        assert_eq!(favorites, vec![1, 2]);

        store.clear().unwrap();
        let favorites: Vec<u64> = store.read(keys::FAVORITES, Vec::new());
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_open_from_uses_configured_dir_and_quota() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());
        let storage = StorageConfig { quota_bytes: 32 };

        let store = Store::open_from(&paths, &storage).unwrap();
        store.write(keys::FAVORITES, &vec![1u64]).unwrap();
        assert!(paths.store_dir().join("favorites.json").exists());

        let err = store.write(keys::SEARCH_HISTORY, &"x".repeat(64)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    }
}
