//! Type-safe price and discount representations using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A currency-agnostic price amount.
///
/// Wraps a [`Decimal`] so that money math never goes through floating point.
/// The currency itself is a storefront-wide display concern, not part of
/// the amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Apply a percentage discount: `price - price * percent / 100`.
    ///
    /// A zero discount returns the price unchanged.
    #[must_use]
    pub fn discounted(&self, discount: DiscountPercent) -> Self {
        if discount.is_zero() {
            return *self;
        }
        let percent = Decimal::from(discount.as_u8());
        Self(self.0 - self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }

    /// Format for display (e.g., "$1499.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Error constructing a [`DiscountPercent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountPercentError {
    #[error("discount percent {0} exceeds 100")]
    OutOfRange(u8),
}

/// A discount percentage, guaranteed to be within 0-100.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// No discount.
    pub const NONE: Self = Self(0);

    /// Create a discount percent, rejecting values above 100.
    ///
    /// # Errors
    ///
    /// Returns `DiscountPercentError::OutOfRange` if `percent > 100`.
    pub const fn try_new(percent: u8) -> Result<Self, DiscountPercentError> {
        if percent > 100 {
            return Err(DiscountPercentError::OutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// Get the underlying percent value.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether this discount is 0%.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_bounds() {
        assert!(DiscountPercent::try_new(0).is_ok());
        assert!(DiscountPercent::try_new(100).is_ok());
        assert_eq!(
            DiscountPercent::try_new(101),
            Err(DiscountPercentError::OutOfRange(101))
        );
    }

    #[test]
    fn test_discounted_price() {
        let price = Price::from(1000);
        let discount = DiscountPercent::try_new(10).expect("valid discount");
        assert_eq!(price.discounted(discount), Price::from(900));
    }

    #[test]
    fn test_zero_discount_is_identity() {
        let price = Price::from(1499);
        assert_eq!(price.discounted(DiscountPercent::NONE), price);
    }

    #[test]
    fn test_line_total() {
        let price = Price::from(900);
        assert_eq!(price.times(3), Decimal::from(2700));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from(1499).display(), "$1499.00");
        let fractional = Price::new(Decimal::new(12345, 2)); // 123.45
        assert_eq!(fractional.display(), "$123.45");
    }
}
