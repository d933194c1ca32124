//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the domain types used by every GoMarketplace component:
//! - `cart` - The persisted cart store library
//! - `cli` - Command-line tools for inspecting and editing a stored cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no async runtime. Anything that touches a key-value
//! store lives in `gomarketplace-cart`.
//!
//! # Modules
//!
//! - [`types`] - Item identifiers, cart line items, and price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
