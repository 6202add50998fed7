//! Typed JSON cache over a [`KeyValueStore`].

use std::rc::Rc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::store::{KeyValueStore, MemoryStore};
use crate::CacheError;

/// Schema version assigned to values written before envelopes existed.
pub const LEGACY_VERSION: u32 = 0;

/// Type-safe cache with automatic JSON serialization.
///
/// Cloning a `Cache` yields another handle onto the same store, which is how the
/// cart store, order history and kitchen request log share one backend.
#[derive(Clone)]
pub struct Cache {
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// A stored value tagged with the schema version it was written with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record<T> {
    /// Schema version of `data`.
    pub version: u32,
    /// The payload.
    pub data: T,
}

impl Cache {
    /// Wrap a store.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Wrap a store the caller keeps its own handle to.
    pub fn from_shared(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Fresh in-memory cache.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open the default Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open_default()?))
    }

    /// Open a file-backed cache rooted at `dir`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(dir: impl Into<std::path::PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::FileStore::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Read a versioned value written by [`Cache::set_record`].
    ///
    /// A value stored without an envelope is treated as [`LEGACY_VERSION`] and
    /// accepted only when `T` can decode it directly. Any other version
    /// mismatch yields [`CacheError::SchemaMismatch`].
    pub fn get_record<T: DeserializeOwned>(
        &self,
        key: &str,
        expected_version: u32,
    ) -> Result<Option<T>, CacheError> {
        let Some(bytes) = self.store.get(key)? else {
            return Ok(None);
        };

        let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
        match envelope_version(&raw) {
            Some(version) if version == expected_version => {
                let record: Record<T> = serde_json::from_value(raw)?;
                Ok(Some(record.data))
            }
            Some(found) => Err(CacheError::SchemaMismatch {
                key: key.to_string(),
                found,
                expected: expected_version,
            }),
            None => {
                tracing::debug!(key, "reading legacy value without schema envelope");
                Ok(Some(serde_json::from_value(raw)?))
            }
        }
    }

    /// Write a value wrapped in a `{"version", "data"}` envelope.
    pub fn set_record<T: Serialize>(
        &self,
        key: &str,
        version: u32,
        value: &T,
    ) -> Result<(), CacheError> {
        self.set(key, &Record { version, data: value })
    }
}

fn envelope_version(raw: &serde_json::Value) -> Option<u32> {
    let obj = raw.as_object()?;
    if obj.len() != 2 || !obj.contains_key("data") {
        return None;
    }
    obj.get("version")?.as_u64().and_then(|v| u32::try_from(v).ok())
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// let key = tableserve_cache::cache_key!("kitchenRequests", "ab12");
/// assert_eq!(key, "kitchenRequests:ab12");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
