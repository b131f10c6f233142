//! Wire types for the catalog backend API.
//!
//! The backend speaks plain JSON. Wire shapes are converted into domain
//! types at this boundary; products that fail validation are rejected
//! here so the pipeline never sees an unknown category group or an
//! out-of-range discount.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use heartwood_core::{
    CategoryGroup, ColorVariant, DiscountPercent, OrderId, Price, Product, ProductError,
    ProductId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireProduct {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub discount_percent: u8,
    /// Free-form group name -> subcategory names; validated into the
    /// fixed [`CategoryGroup`] enumeration.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub colors: Vec<WireColorVariant>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A color variant as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireColorVariant {
    pub name: String,
    #[serde(default)]
    pub swatches: Vec<String>,
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<WireProduct> for Product {
    type Error = ProductError;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        let id = ProductId::new(wire.id);

        let discount = DiscountPercent::try_new(wire.discount_percent).map_err(|_| {
            ProductError::InvalidDiscount {
                id,
                percent: wire.discount_percent,
            }
        })?;

        let mut categories: BTreeMap<CategoryGroup, BTreeSet<String>> = BTreeMap::new();
        for (group_name, subcategories) in wire.categories {
            let group = CategoryGroup::parse(&group_name)
                .ok_or(ProductError::UnknownCategoryGroup(group_name))?;
            categories
                .entry(group)
                .or_default()
                .extend(subcategories);
        }

        Ok(Self {
            id,
            title: wire.title,
            price: Price::new(wire.price),
            stock: wire.stock,
            discount,
            categories,
            variants: wire
                .colors
                .into_iter()
                .map(|c| ColorVariant {
                    name: c.name,
                    swatches: c.swatches,
                    stock: c.stock,
                    image_url: c.image_url,
                })
                .collect(),
            image_url: wire.image_url,
            created_at: wire.created_at,
        })
    }
}

/// One line of an order submission.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wood_type: Option<String>,
    pub unit_price: Price,
    pub discount_percent: u8,
}

/// Order submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    pub lines: Vec<OrderLine>,
    pub shipping: String,
    pub total_price: Decimal,
}

/// The backend's response to a placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    pub user: OrderUser,
    pub order: PlacedOrder,
}

/// The user an order was placed for.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUser {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub total: Decimal,
}

/// Cart quantity sync payload.
#[derive(Debug, Serialize)]
pub(super) struct QuantitySync<'a> {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wood_type: Option<&'a str>,
    pub quantity: u32,
}

/// Response shape of the token validity check.
#[derive(Debug, Deserialize)]
pub(super) struct TokenValidity {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(discount: u8, group: &str) -> WireProduct {
        WireProduct {
            id: 1,
            title: "Armchair".to_string(),
            price: Decimal::from(1000),
            stock: 5,
            discount_percent: discount,
            categories: BTreeMap::from([(group.to_string(), vec!["chairs".to_string()])]),
            colors: Vec::new(),
            image_url: None,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn test_valid_product_converts() {
        let product = Product::try_from(wire(10, "features")).expect("valid product");
        assert_eq!(product.discount.as_u8(), 10);
        assert!(
            product
                .categories
                .get(&CategoryGroup::Features)
                .is_some_and(|subs| subs.contains("chairs"))
        );
    }

    #[test]
    fn test_unknown_category_group_is_rejected() {
        let err = Product::try_from(wire(0, "gadgets")).expect_err("must reject");
        assert_eq!(err, ProductError::UnknownCategoryGroup("gadgets".to_string()));
    }

    #[test]
    fn test_out_of_range_discount_is_rejected() {
        let err = Product::try_from(wire(150, "features")).expect_err("must reject");
        assert_eq!(
            err,
            ProductError::InvalidDiscount {
                id: ProductId::new(1),
                percent: 150
            }
        );
    }
}
