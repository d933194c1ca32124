//! Error types for the cart store.
//!
//! Storage and snapshot failures never interrupt a mutation: they are logged
//! and handed to whoever awaits the [`PendingWrite`](crate::PendingWrite).
//! Only [`CartError::OutsideProvider`] is returned eagerly.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Cart store error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was requested outside of an active provider scope.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    /// Reading or writing the persisted snapshot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The background writer stopped before handling the write.
    #[error("Cart writer stopped before the write completed")]
    WriterStopped,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
