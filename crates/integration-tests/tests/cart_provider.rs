//! Integration tests for scoped cart access.

#![allow(clippy::unwrap_used)]

use gomarketplace_cart::{CartError, CartProvider, use_cart};
use gomarketplace_core::ItemId;
use gomarketplace_integration_tests::{candidate, memory_store};

/// Deep helper that only knows about the provider, not the store.
async fn add_from_product_page(id: &str) -> Result<i32, CartError> {
    let cart = use_cart()?;
    cart.add_to_cart(candidate(id)).await?;
    Ok(cart
        .products()
        .get(&ItemId::new(id))
        .map_or(0, |item| item.quantity))
}

#[test]
fn test_use_cart_without_provider_fails() {
    let err = use_cart().unwrap_err();
    assert!(matches!(err, CartError::OutsideProvider));
    assert!(err.to_string().contains("within a CartProvider"));
}

#[tokio::test]
async fn test_helpers_inside_scope_mutate_the_bound_store() {
    let (store, _kv) = memory_store().await;

    let quantity = CartProvider::scope(store.clone(), async {
        add_from_product_page("a").await.unwrap();
        add_from_product_page("a").await.unwrap()
    })
    .await;

    assert_eq!(quantity, 2);
    assert_eq!(store.products().item_count(), 2);
}

#[tokio::test]
async fn test_nested_scopes_use_innermost_store() {
    let (outer, _) = memory_store().await;
    let (inner, _) = memory_store().await;

    CartProvider::scope(outer.clone(), async {
        add_from_product_page("outer").await.unwrap();

        CartProvider::scope(inner.clone(), async {
            add_from_product_page("inner").await.unwrap();
        })
        .await;

        add_from_product_page("outer").await.unwrap();
    })
    .await;

    assert_eq!(outer.products().len(), 1);
    assert_eq!(outer.products().item_count(), 2);
    assert_eq!(inner.products().len(), 1);
    assert!(inner.products().get(&ItemId::new("inner")).is_some());
}

#[tokio::test]
async fn test_scope_does_not_leak_into_spawned_tasks() {
    let (store, _kv) = memory_store().await;

    let spawned = CartProvider::scope(store, async {
        tokio::spawn(async { use_cart().is_ok() }).await.unwrap()
    })
    .await;

    assert!(!spawned);
}
