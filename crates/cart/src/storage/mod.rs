//! Key-value storage backends for the cart snapshot.
//!
//! The cart store only needs string get/set by key. Values are opaque to the
//! backend; the store decides what goes in them.
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process map, for tests and embedders
//! - [`FileStore`] - One file per key under a data directory

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Asynchronous string key-value store.
///
/// Implementations must be safe to share between tasks; the cart store keeps
/// one behind an `Arc` and calls it from a background task.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
