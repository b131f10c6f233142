//! The in-memory product catalog and its derived listing pipeline.
//!
//! The raw collection lives in [`store::ProductStore`] and flows through a
//! strictly one-directional cascade: sort -> filter -> paginate. The
//! stages are pure functions; [`pipeline::recompute`] is the single entry
//! point that runs them in dependency order.

pub mod criteria;
pub mod filter;
pub mod paginate;
pub mod pipeline;
pub mod refresh;
pub mod snapshot;
pub mod sort;
pub mod store;

pub use criteria::{FilterCriteria, PriceBounds, PriceRange};
pub use filter::filter_products;
pub use paginate::{PageWindow, paginate};
pub use pipeline::{Listing, ListingState, PRODUCTS_PER_PAGE, ViewKind, recompute};
pub use sort::{SortOrder, sort_products};
pub use store::ProductStore;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::{Duration, TimeZone, Utc};
    use heartwood_core::{CategoryGroup, DiscountPercent, Price, Product, ProductId};

    /// A minimal product: id, title, whole-number price, stock 10.
    ///
    /// `created_at` decreases with id so that ascending ids read as a
    /// newest-first fetch order.
    pub fn product(id: i32, title: &str, price: i64) -> Product {
        let epoch = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from(price),
            stock: 10,
            discount: DiscountPercent::NONE,
            categories: BTreeMap::new(),
            variants: Vec::new(),
            image_url: None,
            created_at: epoch - Duration::seconds(i64::from(id)),
        }
    }

    /// A product with category memberships.
    pub fn categorized_product(
        id: i32,
        price: i64,
        pairs: &[(CategoryGroup, &str)],
    ) -> Product {
        let mut categories: BTreeMap<CategoryGroup, BTreeSet<String>> = BTreeMap::new();
        for (group, sub) in pairs {
            categories
                .entry(*group)
                .or_default()
                .insert((*sub).to_string());
        }
        let mut product = product(id, &format!("Product {id}"), price);
        product.categories = categories;
        product
    }
}
