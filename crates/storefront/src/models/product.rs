//! Product domain types.
//!
//! Products are read-only from the storefront's perspective; the seed
//! process owns their lifecycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use trailhead_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Stable catalog ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price (always > 0).
    pub price: Decimal,
    /// Category slug (e.g., "clothing", "shoes", "accessories").
    pub category: String,
    /// Product image URI.
    pub image: String,
    /// Long-form description.
    pub description: String,
    /// Ordered list of marketing features.
    pub features: Vec<String>,
    /// Available sizes (may be empty).
    pub sizes: Vec<String>,
    /// Available colors (may be empty).
    pub colors: Vec<String>,
}
