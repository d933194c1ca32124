//! Cart line items and the ordered cart collection.
//!
//! [`Cart`] owns the pure state transitions (add, increment, decrement,
//! clear). It knows nothing about persistence; the cart store computes the
//! next `Cart` with these methods and then persists that exact value.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::id::ItemId;
use super::price::line_total;

/// One product line in the cart.
///
/// Serialized with the field names the mobile client has always persisted
/// (`image_url`, numeric `price`), so existing snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Identifier of the underlying product.
    pub id: ItemId,
    /// Display name.
    pub title: String,
    /// Image reference.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units in the cart. Never clamped, so it can reach zero or go negative.
    pub quantity: i32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

/// A candidate for [`Cart::add`]: every [`CartItem`] field except quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Identifier of the underlying product.
    pub id: ItemId,
    /// Display name.
    pub title: String,
    /// Image reference.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl NewCartItem {
    /// Create a new candidate item.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the candidate into a line item with the given quantity.
    #[must_use]
    pub fn with_quantity(self, quantity: i32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// The ordered, identity-unique collection of cart items.
///
/// Insertion order is preserved and there is at most one item per [`ItemId`].
/// Persisted as a plain JSON array of [`CartItem`].
///
/// ## Examples
///
/// ```
/// use gomarketplace_core::{Cart, ItemId, NewCartItem};
/// use rust_decimal::Decimal;
///
/// let mut cart = Cart::new();
/// let shirt = NewCartItem::new("a", "Shirt", "u", Decimal::from(10));
///
/// cart.add(shirt.clone());
/// cart.add(shirt);
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.get(&ItemId::new("a")).map(|i| i.quantity), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from a sequence of items.
    ///
    /// If the sequence repeats an id, the first occurrence keeps its
    /// position and fields and the later quantities are added to it.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut positions: HashMap<ItemId, usize> = HashMap::new();
        let mut merged: Vec<CartItem> = Vec::new();

        for item in items {
            if let Some(existing) = positions
                .get(&item.id)
                .and_then(|&pos| merged.get_mut(pos))
            {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                positions.insert(item.id.clone(), merged.len());
                merged.push(item);
            }
        }

        Self { items: merged }
    }

    /// Add one unit of `candidate`.
    ///
    /// If an item with the same id exists its quantity goes up by one and its
    /// other fields are kept (the candidate's values are ignored). Otherwise
    /// the candidate is appended with quantity 1.
    ///
    /// Returns the item's quantity after the add.
    pub fn add(&mut self, candidate: NewCartItem) -> i32 {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == candidate.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        self.items.push(candidate.with_quantity(1));
        1
    }

    /// Increase the quantity of every item matching `id` by one.
    ///
    /// Returns `false` (and leaves the cart unchanged) if nothing matched.
    pub fn increment(&mut self, id: &ItemId) -> bool {
        self.adjust(id, 1)
    }

    /// Decrease the quantity of every item matching `id` by one.
    ///
    /// There is no floor: quantities may reach zero or go negative.
    /// Returns `false` (and leaves the cart unchanged) if nothing matched.
    pub fn decrement(&mut self, id: &ItemId) -> bool {
        self.adjust(id, -1)
    }

    fn adjust(&mut self, id: &ItemId, delta: i32) -> bool {
        let mut matched = false;
        for item in self.items.iter_mut().filter(|i| &i.id == id) {
            item.quantity = item.quantity.saturating_add(delta);
            matched = true;
        }
        matched
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Consume the cart and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn shirt() -> NewCartItem {
        NewCartItem::new("a", "Shirt", "u", Decimal::from(10))
    }

    fn item(id: &str, quantity: i32) -> CartItem {
        NewCartItem::new(id, format!("Item {id}"), "img", Decimal::new(150, 2))
            .with_quantity(quantity)
    }

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(shirt()), 1);

        assert_eq!(
            cart.items(),
            &[CartItem {
                id: ItemId::new("a"),
                title: "Shirt".to_string(),
                image_url: "u".to_string(),
                price: Decimal::from(10),
                quantity: 1,
            }]
        );
    }

    #[test]
    fn test_add_existing_keeps_original_fields() {
        let mut cart = Cart::new();
        cart.add(shirt());
        let renamed = NewCartItem::new("a", "Different", "other", Decimal::from(99));
        assert_eq!(cart.add(renamed), 2);

        assert_eq!(cart.len(), 1);
        let only = &cart.items()[0];
        assert_eq!(only.title, "Shirt");
        assert_eq!(only.image_url, "u");
        assert_eq!(only.price, Decimal::from(10));
        assert_eq!(only.quantity, 2);
    }

    #[test]
    fn test_add_distinct_ids_preserves_order() {
        let mut cart = Cart::new();
        for id in ["c", "a", "b"] {
            cart.add(NewCartItem::new(id, id, "", Decimal::ONE));
        }

        let ids: Vec<&str> = cart.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert!(cart.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn test_increment_and_decrement_missing_id_is_noop() {
        let mut cart = Cart::from_items([item("a", 1)]);
        let before = cart.clone();

        assert!(!cart.increment(&ItemId::new("zzz")));
        assert!(!cart.decrement(&ItemId::new("zzz")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_has_no_floor() {
        let mut cart = Cart::from_items([item("a", 2)]);
        let id = ItemId::new("a");

        cart.decrement(&id);
        cart.decrement(&id);
        assert_eq!(cart.get(&id).unwrap().quantity, 0);

        cart.decrement(&id);
        assert_eq!(cart.get(&id).unwrap().quantity, -1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_increment_then_decrement_restores_quantity() {
        for start in [-2, 0, 1, 5] {
            let mut cart = Cart::from_items([item("a", start), item("b", 7)]);
            let id = ItemId::new("a");
            cart.increment(&id);
            cart.decrement(&id);
            assert_eq!(cart.get(&id).unwrap().quantity, start);
            assert_eq!(cart.get(&ItemId::new("b")).unwrap().quantity, 7);
        }
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = Cart::from_items([item("a", i32::MAX)]);
        cart.increment(&ItemId::new("a"));
        assert_eq!(cart.items()[0].quantity, i32::MAX);
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let cart = Cart::from_items([item("a", 1), item("b", 2), item("a", 3)]);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id.as_str(), "a");
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let cart = Cart::from_items([item("a", 2), item("b", 3)]);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.subtotal(), Decimal::new(750, 2));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::from_items([item("a", 2)]);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let cart = Cart::from_items([item("x", 3)]);
        let json: serde_json::Value = serde_json::to_value(&cart).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "id": "x",
                "title": "Item x",
                "image_url": "img",
                "price": 1.5,
                "quantity": 3
            }])
        );
    }

    #[test]
    fn test_deserializes_camel_case_image_url() {
        let json = r#"[{"id":"x","title":"T","imageUrl":"i","price":10,"quantity":3}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items()[0].image_url, "i");
        assert_eq!(cart.items()[0].price, Decimal::from(10));
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let cart = Cart::from_items([item("b", 1), item("a", -3), item("c", 0)]);
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
