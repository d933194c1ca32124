//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{Cart, CartItem, NewCartItem};
pub use id::{ItemId, ItemIdError};
pub use price::{Decimal, format_price, line_total};
