//! GoMarketplace Cart - Persisted shopping cart store.
//!
//! Holds the cart's line items in memory, exposes add / increment /
//! decrement, and keeps a snapshot in a key-value store so the cart survives
//! restarts.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart. Mutations update memory synchronously and
//!   queue a snapshot write, returning a [`PendingWrite`] the caller may await.
//! - A single background task per store loads the snapshot on open and then
//!   performs queued writes in order.
//! - [`storage::KeyValueStore`] abstracts the device storage; [`storage::FileStore`]
//!   and [`storage::MemoryStore`] ship with the crate.
//! - [`CartProvider`] and [`use_cart`] give scoped access without a global.
//!
//! # Example
//!
//! ```no_run
//! use gomarketplace_cart::{CartConfig, CartStore, storage::FileStore};
//! use gomarketplace_core::{Decimal, NewCartItem};
//!
//! # async fn demo() -> Result<(), gomarketplace_cart::CartError> {
//! let config = CartConfig::from_env().unwrap_or_default();
//! let store = CartStore::load(FileStore::new(&config.data_dir), config).await?;
//!
//! store
//!     .add_to_cart(NewCartItem::new("a", "Shirt", "shirt.png", Decimal::from(10)))
//!     .await?;
//! assert_eq!(store.products().item_count(), 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod persist;
pub mod provider;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, SnapshotPolicy};
pub use error::{CartError, Result, StorageError};
pub use persist::{PendingWrite, WriteOutcome};
pub use provider::{CartProvider, use_cart};
pub use store::{CartStore, CartStoreBuilder, StoreStatus};
