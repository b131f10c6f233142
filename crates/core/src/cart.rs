//! Cart line items.
//!
//! A line is uniquely keyed by (product id, selected color name): the same
//! base product in two colors makes two distinct lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DiscountPercent, Price, ProductId};

/// Uniqueness key for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub color: Option<String>,
}

impl LineKey {
    /// Create a new line key.
    #[must_use]
    pub fn new(product_id: ProductId, color: Option<String>) -> Self {
        Self { product_id, color }
    }
}

/// One entry in the cart.
///
/// Quantity is at least 1; a decrement below 1 removes the line instead.
/// The quantity is UI-clamped to the captured stock for display but not
/// hard-blocked here - checkout validation is the hard gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub discount: DiscountPercent,
    /// Selected color variant name, if any.
    pub color: Option<String>,
    /// Optional wood-type attribute chosen at add time.
    pub wood_type: Option<String>,
    /// Stock captured when the line was created, for display clamping.
    pub stock: u32,
    pub image_url: Option<String>,
}

impl CartLine {
    /// The uniqueness key for this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.color.clone())
    }

    /// Unit price after the line's discount.
    #[must_use]
    pub fn discounted_unit_price(&self) -> Price {
        self.unit_price.discounted(self.discount)
    }

    /// Line total: discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.discounted_unit_price().times(self.quantity)
    }
}
