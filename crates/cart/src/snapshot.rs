//! Persisted cart snapshot codec.
//!
//! A snapshot is the cart serialized as a JSON array of line items, in cart
//! order. It is overwritten wholesale on every write.

use gomarketplace_core::Cart;

/// Serialize a cart into its persisted form.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Parse a persisted snapshot back into a cart.
///
/// # Errors
///
/// Returns `serde_json::Error` if the value is not a JSON array of cart items.
pub fn decode(raw: &str) -> Result<Cart, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gomarketplace_core::{Decimal, ItemId, NewCartItem};

    use super::*;

    #[test]
    fn test_round_trip() {
        let mut cart = Cart::new();
        cart.add(NewCartItem::new("b", "Boots", "b.png", Decimal::new(4999, 2)));
        cart.add(NewCartItem::new("a", "Shirt", "a.png", Decimal::from(10)));
        cart.increment(&ItemId::new("a"));

        let decoded = decode(&encode(&cart).unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_empty_cart_is_empty_array() {
        assert_eq!(encode(&Cart::new()).unwrap(), "[]");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_snapshot_from_mobile_client() {
        let raw = r#"[{"id":"x","title":"Mug","image_url":"https://img/x.png","price":12.5,"quantity":3}]"#;
        let cart = decode(raw).unwrap();

        let item = cart.get(&ItemId::new("x")).unwrap();
        assert_eq!(item.title, "Mug");
        assert_eq!(item.price, Decimal::new(125, 1));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"id":"x"}"#).is_err());
        assert!(decode(r#"[{"id":"x"}]"#).is_err());
    }
}
