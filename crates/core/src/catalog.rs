//! Product catalog types and the category taxonomy.
//!
//! Categories are a fixed enumeration of groups, each holding a set of
//! subcategory names. The backend sends free-form group names; they are
//! validated into [`CategoryGroup`] at the store boundary so the rest of
//! the pipeline never deals with unknown groups.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DiscountPercent, Price, ProductId};

/// The fixed enumeration of category groups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    /// Furniture type: chairs, sofa, table, bed, ...
    Features,
    /// Target room: living, bedroom, office, ...
    Rooms,
    /// Wood species: oak, walnut, teak, ...
    Woods,
    /// Design style: modern, rustic, scandinavian, ...
    Styles,
}

impl CategoryGroup {
    /// All groups, in display order.
    pub const ALL: [Self; 4] = [Self::Features, Self::Rooms, Self::Woods, Self::Styles];

    /// Parse from a wire or URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "features" => Some(Self::Features),
            "rooms" => Some(Self::Rooms),
            "woods" => Some(Self::Woods),
            "styles" => Some(Self::Styles),
            _ => None,
        }
    }

    /// Convert to a wire or URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Features => "features",
            Self::Rooms => "rooms",
            Self::Woods => "woods",
            Self::Styles => "styles",
        }
    }
}

impl std::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (group, subcategory) tuple: the atomic, independently toggleable
/// filter unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPair {
    pub group: CategoryGroup,
    pub subcategory: String,
}

impl CategoryPair {
    /// Create a new category pair.
    #[must_use]
    pub fn new(group: CategoryGroup, subcategory: impl Into<String>) -> Self {
        Self {
            group,
            subcategory: subcategory.into(),
        }
    }
}

/// A color variant of a product, with its own stock and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVariant {
    /// Variant name (e.g., "Charcoal"). Part of the cart line key.
    pub name: String,
    /// Swatch colors shown in the picker (CSS color values).
    pub swatches: Vec<String>,
    /// Stock for this variant, independent of the base product.
    pub stock: u32,
    /// Variant-specific image, if any.
    pub image_url: Option<String>,
}

/// A catalog product.
///
/// Immutable once fetched: the collection is replaced wholesale on
/// re-fetch, with optimistic inserts/updates/removals keyed by [`ProductId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub stock: u32,
    pub discount: DiscountPercent,
    /// Category membership: group -> set of subcategory names.
    pub categories: BTreeMap<CategoryGroup, BTreeSet<String>>,
    /// Optional color variants.
    pub variants: Vec<ColorVariant>,
    pub image_url: Option<String>,
    /// Server-side creation time; the fetch order is newest-first.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether this product belongs to the given (group, subcategory) pair.
    #[must_use]
    pub fn in_category(&self, pair: &CategoryPair) -> bool {
        self.categories
            .get(&pair.group)
            .is_some_and(|subs| subs.contains(&pair.subcategory))
    }

    /// The unit price after applying the product's discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount)
    }

    /// Stock for a selected color, falling back to base stock when no
    /// color is selected.
    #[must_use]
    pub fn stock_for_color(&self, color: Option<&str>) -> u32 {
        match color {
            Some(name) => self
                .variants
                .iter()
                .find(|v| v.name == name)
                .map_or(self.stock, |v| v.stock),
            None => self.stock,
        }
    }
}

/// Validation errors raised at the catalog boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("unknown category group: {0}")]
    UnknownCategoryGroup(String),
    #[error("invalid discount for product {id}: {percent}")]
    InvalidDiscount { id: ProductId, percent: u8 },
}
