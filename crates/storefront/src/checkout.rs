//! Checkout summary calculation.
//!
//! A pure function over an enriched line list: no hidden state, no
//! currency or locale abstraction. Shipping is a flat fee on non-empty
//! carts and tax is a fixed rate; every figure is rounded to 2 decimal
//! places with standard (midpoint away from zero) rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::CartItem;

/// Flat shipping fee applied to any non-empty cart ($5.99).
fn shipping_flat_fee() -> Decimal {
    Decimal::new(599, 2)
}

/// Fixed tax rate (8%).
fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The derived totals for a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the summary for an enriched line list.
    ///
    /// `subtotal = Σ price × quantity`; shipping applies only when the
    /// subtotal is positive; `tax = subtotal × 8%`. Deterministic:
    /// the same line list always yields the same summary.
    #[must_use]
    pub fn calculate(items: &[CartItem]) -> Self {
        let subtotal: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        let subtotal = round2(subtotal);

        let shipping = if subtotal > Decimal::ZERO {
            shipping_flat_fee()
        } else {
            Decimal::ZERO
        };
        let tax = round2(subtotal * tax_rate());
        let total = round2(subtotal + shipping + tax);

        Self {
            subtotal,
            shipping,
            tax,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhead_core::ProductId;

    fn item(price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: "1".to_string(),
            product_id: ProductId::new(1),
            name: "Test Product".to_string(),
            price: price.parse().expect("valid decimal"),
            quantity,
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let summary = OrderSummary::calculate(&[]);
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_100_scenario() {
        // Subtotal 100.00 -> shipping 5.99, tax 8.00 (8%), total 113.99.
        let summary = OrderSummary::calculate(&[item("25.00", 4)]);
        assert_eq!(summary.subtotal, "100.00".parse::<Decimal>().expect("dec"));
        assert_eq!(summary.shipping, "5.99".parse::<Decimal>().expect("dec"));
        assert_eq!(summary.tax, "8.00".parse::<Decimal>().expect("dec"));
        assert_eq!(summary.total, "113.99".parse::<Decimal>().expect("dec"));
    }

    #[test]
    fn test_line_total_269_97() {
        // 89.99 x 3 = 269.97
        let summary = OrderSummary::calculate(&[item("89.99", 3)]);
        assert_eq!(summary.subtotal, "269.97".parse::<Decimal>().expect("dec"));
    }

    #[test]
    fn test_calculator_is_idempotent() {
        let items = vec![item("89.99", 2), item("29.99", 1)];
        let first = OrderSummary::calculate(&items);
        let second = OrderSummary::calculate(&items);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_subtotal_means_zero_shipping() {
        // A line list that sums to zero quantity still has no shipping.
        let summary = OrderSummary::calculate(&[]);
        assert_eq!(summary.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_midpoint_away_from_zero() {
        // 1.99 * 3 = 5.97; tax = 0.4776 -> 0.48
        let summary = OrderSummary::calculate(&[item("1.99", 3)]);
        assert_eq!(summary.tax, "0.48".parse::<Decimal>().expect("dec"));
    }
}
