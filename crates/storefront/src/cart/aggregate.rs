//! Cart aggregation.
//!
//! Pure math over the cart lines: per-line discounted prices, cart totals,
//! and the shipping contribution. Checkout eligibility is a separate
//! pre-submission validation, not part of the aggregation itself.

use heartwood_core::{CartLine, LineKey, Price};
use rust_decimal::Decimal;
use thiserror::Error;

/// Per-line aggregation output.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTotals {
    pub key: LineKey,
    /// Unit price after the line's discount (equal to the unit price when
    /// no discount applies).
    pub discounted_unit_price: Price,
    /// Discounted unit price times quantity.
    pub line_total: Decimal,
}

/// Aggregated cart totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartTotals {
    pub total_quantity: u32,
    /// Sum of discounted line totals, before shipping.
    pub total_price: Decimal,
    pub lines: Vec<LineTotals>,
}

/// Compute totals over the cart lines.
///
/// `total_price == sum(price_i * (1 - discount_i / 100) * qty_i)`, exact
/// in decimal arithmetic. Quantities are summed as-is: a quantity above
/// the available stock is a checkout problem, not an aggregation one.
#[must_use]
pub fn aggregate(lines: &[CartLine]) -> CartTotals {
    let mut totals = CartTotals::default();
    for line in lines {
        let discounted = line.discounted_unit_price();
        let line_total = line.line_total();
        totals.total_quantity += line.quantity;
        totals.total_price += line_total;
        totals.lines.push(LineTotals {
            key: line.key(),
            discounted_unit_price: discounted,
            line_total,
        });
    }
    totals
}

/// Shipping rate tiers, resolved per order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingRate {
    #[default]
    Standard,
    Express,
    Free,
}

impl ShippingRate {
    /// Parse from a form value. Unknown values fall back to `Standard`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "express" => Self::Express,
            "free" => Self::Free,
            _ => Self::Standard,
        }
    }

    /// Convert to a form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Free => "free",
        }
    }

    /// The per-unit rate for this tier.
    #[must_use]
    pub fn per_unit(self) -> Price {
        match self {
            Self::Standard => Price::from(49),
            Self::Express => Price::from(99),
            Self::Free => Price::ZERO,
        }
    }

    /// Shipping contribution: per-unit rate times total quantity.
    #[must_use]
    pub fn contribution(self, total_quantity: u32) -> Decimal {
        self.per_unit().times(total_quantity)
    }
}

/// A line whose quantity exceeds the live stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockViolation {
    pub key: LineKey,
    pub title: String,
    pub quantity: u32,
    pub stock: u32,
}

/// Checkout blocked by stock violations. Surfaced as a user-facing
/// warning; no order call is made while this holds.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} item(s) exceed available stock", .violations.len())]
pub struct CheckoutBlocked {
    pub violations: Vec<StockViolation>,
}

/// Pre-submission validation: every line's quantity must fit the live
/// stock for its (product, color) selection.
///
/// `stock_of` resolves the current stock for a line; lines whose product
/// vanished from the catalog resolve to 0 and therefore block too.
///
/// # Errors
///
/// Returns `CheckoutBlocked` listing every violating line.
pub fn validate_for_checkout(
    lines: &[CartLine],
    stock_of: impl Fn(&CartLine) -> u32,
) -> Result<(), CheckoutBlocked> {
    let violations: Vec<StockViolation> = lines
        .iter()
        .filter_map(|line| {
            let stock = stock_of(line);
            (line.quantity > stock).then(|| StockViolation {
                key: line.key(),
                title: line.title.clone(),
                quantity: line.quantity,
                stock,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CheckoutBlocked { violations })
    }
}

#[cfg(test)]
mod tests {
    use heartwood_core::{DiscountPercent, ProductId};

    use super::*;

    fn line(id: i32, price: i64, discount: u8, quantity: u32, stock: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            quantity,
            unit_price: Price::from(price),
            discount: DiscountPercent::try_new(discount).expect("valid discount"),
            color: None,
            wood_type: None,
            stock,
            image_url: None,
        }
    }

    #[test]
    fn test_discounted_line() {
        // price=1000, discount=10, quantity=3 -> unit 900, line total 2700
        let totals = aggregate(&[line(1, 1000, 10, 3, 10)]);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total_price, Decimal::from(2700));
        assert_eq!(totals.lines[0].discounted_unit_price, Price::from(900));
        assert_eq!(totals.lines[0].line_total, Decimal::from(2700));
    }

    #[test]
    fn test_heterogeneous_cart() {
        let lines = vec![
            line(1, 1000, 10, 3, 10), // 2700
            line(2, 500, 0, 2, 10),   // 1000
            line(3, 200, 50, 1, 10),  // 100
        ];
        let totals = aggregate(&lines);
        assert_eq!(totals.total_quantity, 6);
        assert_eq!(totals.total_price, Decimal::from(3800));
        assert_eq!(totals.lines.len(), 3);
    }

    #[test]
    fn test_empty_cart_aggregates_to_zero() {
        let totals = aggregate(&[]);
        assert_eq!(totals.total_quantity, 0);
        assert_eq!(totals.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_shipping_contribution() {
        assert_eq!(ShippingRate::Standard.contribution(6), Decimal::from(294));
        assert_eq!(ShippingRate::Express.contribution(2), Decimal::from(198));
        assert_eq!(ShippingRate::Free.contribution(100), Decimal::ZERO);
    }

    #[test]
    fn test_shipping_parse_roundtrip() {
        for rate in [ShippingRate::Standard, ShippingRate::Express, ShippingRate::Free] {
            assert_eq!(ShippingRate::parse(rate.as_str()), rate);
        }
        assert_eq!(ShippingRate::parse("overnight"), ShippingRate::Standard);
    }

    #[test]
    fn test_checkout_blocked_when_quantity_exceeds_stock() {
        let lines = vec![line(1, 100, 0, 5, 3), line(2, 100, 0, 1, 10)];
        let err = validate_for_checkout(&lines, |l| l.stock).expect_err("must block");
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].key.product_id, ProductId::new(1));
        assert_eq!(err.violations[0].quantity, 5);
        assert_eq!(err.violations[0].stock, 3);
    }

    #[test]
    fn test_checkout_allowed_at_exact_stock() {
        let lines = vec![line(1, 100, 0, 3, 3)];
        assert!(validate_for_checkout(&lines, |l| l.stock).is_ok());
    }

    #[test]
    fn test_vanished_product_blocks_checkout() {
        let lines = vec![line(1, 100, 0, 1, 10)];
        let err = validate_for_checkout(&lines, |_| 0).expect_err("must block");
        assert_eq!(err.violations[0].stock, 0);
    }
}
