//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart store behavior against an in-memory store
//! - `cart_persistence` - Reload and snapshot format against the file store
//! - `cart_provider` - Scoped access through `CartProvider`
//!
//! This crate only provides fixtures shared by the test files.

use gomarketplace_cart::storage::MemoryStore;
use gomarketplace_cart::{CartConfig, CartStore};
use gomarketplace_core::{Decimal, NewCartItem};

/// Storage key used by the default configuration.
pub const KEY: &str = gomarketplace_cart::config::DEFAULT_STORAGE_KEY;

/// Candidate item with a predictable title, image and price.
#[must_use]
pub fn candidate(id: &str) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {id}"),
        format!("https://img.example/{id}.png"),
        Decimal::new(1950, 2),
    )
}

/// A loaded store over a fresh in-memory backend.
///
/// # Panics
///
/// Panics if the store fails to load, which only happens if the runtime is
/// shutting down.
pub async fn memory_store() -> (CartStore, MemoryStore) {
    let kv = MemoryStore::new();
    let store = CartStore::load(kv.clone(), CartConfig::default())
        .await
        .unwrap_or_else(|e| panic!("store failed to load: {e}"));
    (store, kv)
}
