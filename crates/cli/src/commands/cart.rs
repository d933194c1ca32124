//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! gm-cli cart show
//! gm-cli cart add --id a --title Shirt --image-url a.png --price 10
//! gm-cli cart increment a
//! gm-cli cart decrement a
//! gm-cli cart clear
//! ```
//!
//! Every command opens the file-backed cart, waits for it to load, applies
//! at most one mutation and waits for that write before returning.

use std::io::{self, Write};

use gomarketplace_cart::storage::FileStore;
use gomarketplace_cart::{
    CartConfig, CartError, CartStore, ConfigError, PendingWrite, WriteOutcome,
};
use gomarketplace_core::{Cart, Decimal, ItemId, NewCartItem, format_price};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart store failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Writing to stdout failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

/// Open the cart described by the environment.
async fn open_store() -> Result<CartStore, CommandError> {
    let config = CartConfig::from_env()?;
    tracing::debug!(dir = %config.data_dir.display(), "Opening cart");
    let kv = FileStore::new(config.data_dir.clone());
    Ok(CartStore::load(kv, config).await?)
}

/// Wait for a mutation's write and print the resulting cart.
async fn finish(store: &CartStore, write: PendingWrite) -> Result<(), CommandError> {
    match write.await? {
        WriteOutcome::Persisted => tracing::info!("Cart saved"),
        WriteOutcome::Superseded => tracing::warn!("Cart write was superseded"),
    }
    render(&store.products(), &mut io::stdout().lock())?;
    Ok(())
}

/// Print the stored cart.
pub async fn show() -> Result<(), CommandError> {
    let store = open_store().await?;
    render(&store.products(), &mut io::stdout().lock())?;
    Ok(())
}

/// Add one unit of a product.
pub async fn add(
    id: ItemId,
    title: String,
    image_url: String,
    price: Decimal,
) -> Result<(), CommandError> {
    let store = open_store().await?;
    let write = store.add_to_cart(NewCartItem {
        id,
        title,
        image_url,
        price,
    });
    finish(&store, write).await
}

/// Increase an item's quantity by one.
pub async fn increment(id: &ItemId) -> Result<(), CommandError> {
    let store = open_store().await?;
    warn_if_absent(&store, id);
    let write = store.increment(id);
    finish(&store, write).await
}

/// Decrease an item's quantity by one.
pub async fn decrement(id: &ItemId) -> Result<(), CommandError> {
    let store = open_store().await?;
    warn_if_absent(&store, id);
    let write = store.decrement(id);
    finish(&store, write).await
}

/// Remove every item.
pub async fn clear() -> Result<(), CommandError> {
    let store = open_store().await?;
    let write = store.clear();
    finish(&store, write).await
}

/// Unknown ids are a no-op for the store; say so rather than fail.
fn warn_if_absent(store: &CartStore, id: &ItemId) {
    if store.products().get(id).is_none() {
        tracing::warn!(%id, "No item with this id in the cart, nothing changes");
    }
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart, out: &mut impl Write) -> io::Result<()> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for item in cart {
        writeln!(
            out,
            "{:<16} {:<32} {:>5} x {:>10} = {:>10}",
            item.id.as_str(),
            item.title,
            item.quantity,
            format_price(item.price),
            format_price(item.line_total()),
        )?;
    }
    writeln!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count(),
        format_price(cart.subtotal())
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use gomarketplace_core::CartItem;

    use super::*;

    fn render_to_string(cart: &Cart) -> String {
        let mut buf = Vec::new();
        render(cart, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_to_string(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_subtotal() {
        let cart = Cart::from_items([
            CartItem {
                id: ItemId::new("a"),
                title: "Shirt".to_string(),
                image_url: "u".to_string(),
                price: Decimal::from(10),
                quantity: 2,
            },
            CartItem {
                id: ItemId::new("b"),
                title: "Socks".to_string(),
                image_url: "s".to_string(),
                price: Decimal::new(350, 2),
                quantity: 1,
            },
        ]);

        let out = render_to_string(&cart);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("a "));
        assert!(lines[0].contains("$10.00"));
        assert!(lines[0].ends_with("$20.00"));
        assert!(lines[1].contains("Socks"));
        assert_eq!(lines[2], "3 item(s), subtotal $23.50");
    }
}
