//! Product identifier used to key cart line items.
//!
//! Cart items are keyed by the storefront's product identifier, which is an
//! opaque string (the catalog API hands them out, the cart never mints them).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemIdError {
    /// The input string is empty or only whitespace.
    #[error("item id cannot be empty")]
    Empty,
}

/// Identifier of the product behind a cart line item.
///
/// Two line items with equal `ItemId`s are the same product; a cart holds at
/// most one line item per `ItemId`.
///
/// ## Examples
///
/// ```
/// use gomarketplace_core::ItemId;
///
/// let id = ItemId::parse("sku-42").unwrap();
/// assert_eq!(id.as_str(), "sku-42");
///
/// assert!(ItemId::parse("").is_err());
/// assert!(ItemId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an `ItemId` without validation.
    ///
    /// Use this for identifiers that come from a trusted source such as the
    /// catalog API or a persisted snapshot.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an `ItemId` from user input.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ItemIdError::Empty`] if nothing remains after trimming.
    pub fn parse(s: &str) -> Result<Self, ItemIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ItemIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ItemId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ItemId::parse("  abc ").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ItemId::parse(""), Err(ItemIdError::Empty));
        assert_eq!(ItemId::parse("\t\n"), Err(ItemIdError::Empty));
    }

    #[test]
    fn test_new_does_not_validate() {
        // Persisted snapshots are trusted as-is
        let id = ItemId::new(" spaced ");
        assert_eq!(id.as_str(), " spaced ");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ItemId::new("x");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"x\"");

        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display_and_from_str() {
        let id: ItemId = "p-1".parse().unwrap();
        assert_eq!(id.to_string(), "p-1");
        assert_eq!(id, ItemId::from("p-1"));
    }
}
