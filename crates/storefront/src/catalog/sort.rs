//! Sort stage of the listing pipeline.
//!
//! Pure function over the raw collection: the input is never mutated and
//! the fetch order (newest-first) is the reference order for `Latest` and
//! `Oldest`.

use heartwood_core::Product;

/// Sort criterion for the product listing. Exactly one is active at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortOrder {
    /// Collection order as fetched (server-side newest-first). Identity.
    #[default]
    Latest,
    /// Title A -> Z, case-insensitive.
    NameAsc,
    /// Title Z -> A, case-insensitive.
    NameDesc,
    /// Price low -> high.
    PriceAsc,
    /// Price high -> low.
    PriceDesc,
    /// Reverse of the fetch order.
    Oldest,
}

impl SortOrder {
    /// Parse from a URL parameter value. Unknown values fall back to `Latest`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name-ascending" => Self::NameAsc,
            "name-descending" => Self::NameDesc,
            "price-ascending" => Self::PriceAsc,
            "price-descending" => Self::PriceDesc,
            "oldest" => Self::Oldest,
            _ => Self::Latest,
        }
    }

    /// Convert to a URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::NameAsc => "name-ascending",
            Self::NameDesc => "name-descending",
            Self::PriceAsc => "price-ascending",
            Self::PriceDesc => "price-descending",
            Self::Oldest => "oldest",
        }
    }

    /// Human-readable label for the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::NameAsc => "Name, A-Z",
            Self::NameDesc => "Name, Z-A",
            Self::PriceAsc => "Price, low to high",
            Self::PriceDesc => "Price, high to low",
            Self::Oldest => "Oldest",
        }
    }

    /// All criteria, in dropdown order.
    pub const ALL: [Self; 6] = [
        Self::Latest,
        Self::NameAsc,
        Self::NameDesc,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Oldest,
    ];
}

/// Sort a collection by the given criterion into a new vector.
///
/// Name sorts tie-break case-insensitively; equal prices keep whatever
/// order the sort primitive gives.
#[must_use]
pub fn sort_products(products: &[Product], order: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match order {
        SortOrder::Latest => {}
        SortOrder::Oldest => sorted.reverse(),
        SortOrder::NameAsc => {
            sorted.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
        SortOrder::NameDesc => {
            sorted.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()));
        }
        SortOrder::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;

    #[test]
    fn test_parse_roundtrip() {
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::parse(order.as_str()), order);
        }
        assert_eq!(SortOrder::parse("unknown"), SortOrder::Latest);
    }

    #[test]
    fn test_latest_is_identity() {
        let products = vec![product(3, "C", 30), product(1, "A", 10), product(2, "B", 20)];
        let sorted = sort_products(&products, SortOrder::Latest);
        assert_eq!(sorted, products);
    }

    #[test]
    fn test_oldest_reverses_fetch_order() {
        let products = vec![product(3, "C", 30), product(1, "A", 10)];
        let sorted = sort_products(&products, SortOrder::Oldest);
        let ids: Vec<i32> = sorted.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let products = vec![
            product(1, "walnut desk", 10),
            product(2, "Armchair", 20),
            product(3, "birch stool", 30),
        ];
        let sorted = sort_products(&products, SortOrder::NameAsc);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Armchair", "birch stool", "walnut desk"]);

        let reversed = sort_products(&products, SortOrder::NameDesc);
        let titles: Vec<&str> = reversed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["walnut desk", "birch stool", "Armchair"]);
    }

    #[test]
    fn test_price_sort() {
        let products = vec![product(1, "A", 500), product(2, "B", 100), product(3, "C", 300)];
        let asc = sort_products(&products, SortOrder::PriceAsc);
        let prices: Vec<i64> = asc
            .iter()
            .map(|p| i64::try_from(p.price.amount().mantissa()).expect("small"))
            .collect();
        assert_eq!(prices, vec![100, 300, 500]);

        let desc = sort_products(&products, SortOrder::PriceDesc);
        let prices: Vec<i64> = desc
            .iter()
            .map(|p| i64::try_from(p.price.amount().mantissa()).expect("small"))
            .collect();
        assert_eq!(prices, vec![500, 300, 100]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let products = vec![product(1, "B", 20), product(2, "A", 10)];
        let before = products.clone();
        let _ = sort_products(&products, SortOrder::NameAsc);
        assert_eq!(products, before);
    }
}
