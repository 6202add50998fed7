//! Key-Value persistence layer for TableServe.
//!
//! The ordering core persists its cart and order history through a small,
//! synchronous key-value interface, the same shape as browser local storage.
//! This crate provides that interface, the backends behind it, and a typed
//! JSON [`Cache`] with schema-version envelopes.
//!
//! # Example
//!
//! ```rust
//! use tableserve_cache::Cache;
//!
//! let cache = Cache::in_memory();
//! cache.set_record("cartItems", 1, &vec!["52874"]).unwrap();
//!
//! let items: Vec<String> = cache.get_record("cartItems", 1).unwrap().unwrap();
//! assert_eq!(items, vec!["52874".to_string()]);
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::{Cache, Record, LEGACY_VERSION};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KeyValueStore, MemoryStore};
}
