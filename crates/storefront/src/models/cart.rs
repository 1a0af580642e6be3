//! Cart domain types.
//!
//! A cart line is unique per (owner, product, size, color). Persistent
//! lines are database rows with numeric IDs; guest lines live in the
//! session and use a synthetic `"{product}-{size}-{color}"` ID. Both
//! are exposed to callers as [`CartItem`] with a string ID.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trailhead_core::ProductId;

/// Upper bound on a single line's quantity.
///
/// Keeps repeated add-or-increment writes from growing a line without
/// bound (and, on the guest side, from overflowing the i32 quantity).
pub const MAX_LINE_QUANTITY: i32 = 99;

/// The identity key of a cart line within one owner's cart.
///
/// Two lines with the same product but different size or color are
/// distinct lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    /// Create a key, treating empty strings as absent.
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<String>, color: Option<String>) -> Self {
        Self {
            product_id,
            size: size.filter(|s| !s.is_empty()),
            color: color.filter(|c| !c.is_empty()),
        }
    }

    /// The synthetic line ID used by the guest backend, matching the
    /// `"{product}-{size}-{color}"` shape of the stored guest lines.
    #[must_use]
    pub fn guest_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.product_id,
            self.size.as_deref().unwrap_or(""),
            self.color.as_deref().unwrap_or("")
        )
    }

    /// Size column value (`''` when absent) for the persistent backend.
    #[must_use]
    pub fn size_column(&self) -> &str {
        self.size.as_deref().unwrap_or("")
    }

    /// Color column value (`''` when absent) for the persistent backend.
    #[must_use]
    pub fn color_column(&self) -> &str {
        self.color.as_deref().unwrap_or("")
    }
}

/// A cart line enriched with current product name and price.
///
/// This is the shape returned to API callers from every cart read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line ID: the database row ID for authenticated carts, the
    /// synthetic key for guest carts.
    pub id: String,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A cart line as stored in the session for anonymous visitors.
///
/// Only the product reference and quantity are persisted; name and
/// price are joined from the catalog at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestLine {
    /// Synthetic ID: `"{product}-{size}-{color}"`.
    pub id: String,
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GuestLine {
    /// Create a new guest line for the given key.
    #[must_use]
    pub fn new(key: &LineKey, quantity: i32) -> Self {
        Self {
            id: key.guest_id(),
            product_id: key.product_id,
            quantity,
            size: key.size.clone(),
            color: key.color.clone(),
        }
    }

    /// The identity key of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size.clone(), self.color.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_key_normalizes_empty_to_none() {
        let key = LineKey::new(
            ProductId::new(1),
            Some(String::new()),
            Some("Navy".to_string()),
        );
        assert_eq!(key.size, None);
        assert_eq!(key.color.as_deref(), Some("Navy"));
    }

    #[test]
    fn test_guest_id_shape() {
        let key = LineKey::new(ProductId::new(3), Some("M".to_string()), None);
        assert_eq!(key.guest_id(), "3-M-");

        let bare = LineKey::new(ProductId::new(6), None, None);
        assert_eq!(bare.guest_id(), "6--");
    }

    #[test]
    fn test_guest_line_key_roundtrip() {
        let key = LineKey::new(
            ProductId::new(2),
            Some("32".to_string()),
            Some("Khaki".to_string()),
        );
        let line = GuestLine::new(&key, 2);
        assert_eq!(line.key(), key);
        assert_eq!(line.id, "2-32-Khaki");
    }
}
