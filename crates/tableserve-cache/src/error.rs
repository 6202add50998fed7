//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// The write would exceed the store's capacity.
    #[error("Storage quota exceeded writing {key}: needed {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// A stored record was written with a different schema version.
    #[error("Schema mismatch for {key}: found version {found}, expected {expected}")]
    SchemaMismatch { key: String, found: u32, expected: u32 },

    /// Filesystem error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Whether retrying the same write later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CacheError::StoreError(_) | CacheError::QuotaExceeded { .. } | CacheError::Io(_)
        )
    }
}
