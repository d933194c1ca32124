//! Scoped access to a cart store.
//!
//! Code that cannot take a [`CartStore`] argument (deep call chains, request
//! handlers) can run inside [`CartProvider::scope`] and fetch the store with
//! [`use_cart`]. There is no global store: outside a scope `use_cart` fails.

use std::future::Future;

use crate::error::{CartError, Result};
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Binds a [`CartStore`] to a task for the duration of a future.
pub struct CartProvider;

impl CartProvider {
    /// Run `fut` with `store` as the current cart.
    ///
    /// Scopes nest; the innermost store wins. The binding does not follow
    /// tasks spawned from inside `fut`.
    pub async fn scope<F>(store: CartStore, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(store, fut).await
    }

    /// Run `f` synchronously with `store` as the current cart.
    pub fn sync_scope<R>(store: CartStore, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(store, f)
    }
}

/// The cart store bound by the enclosing [`CartProvider`] scope.
///
/// # Errors
///
/// Returns `CartError::OutsideProvider` when called outside a scope.
pub fn use_cart() -> Result<CartStore> {
    CURRENT_CART
        .try_with(CartStore::clone)
        .map_err(|_| CartError::OutsideProvider)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gomarketplace_core::{Decimal, NewCartItem};

    use super::*;
    use crate::config::CartConfig;
    use crate::storage::MemoryStore;

    #[test]
    fn test_use_cart_outside_scope() {
        let err = use_cart().unwrap_err();
        assert!(matches!(err, CartError::OutsideProvider));
        assert_eq!(err.to_string(), "use_cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_use_cart_inside_scope_shares_state() {
        let store = CartStore::load(MemoryStore::new(), CartConfig::default())
            .await
            .unwrap();

        CartProvider::scope(store.clone(), async {
            let cart = use_cart().unwrap();
            cart.add_to_cart(NewCartItem::new("a", "Shirt", "u", Decimal::from(10)))
                .await
                .unwrap();
        })
        .await;

        assert_eq!(store.products().len(), 1);
        assert!(use_cart().is_err());
    }

    #[tokio::test]
    async fn test_sync_scope() {
        let store = CartStore::open(MemoryStore::new(), CartConfig::default());
        let len = CartProvider::sync_scope(store, || use_cart().unwrap().products().len());
        assert_eq!(len, 0);
    }
}
