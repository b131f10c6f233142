//! Filter stage of the listing pipeline.
//!
//! A full re-filter over the sorted collection: category pairs combine
//! with OR across all groups, the price range combines with AND against
//! the category test.

use heartwood_core::Product;

use super::criteria::FilterCriteria;

/// Filter a collection by the given criteria into a new vector.
///
/// With no criteria active this is the identity transform.
#[must_use]
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    if criteria.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|product| passes_categories(product, criteria) && passes_price(product, criteria))
        .cloned()
        .collect()
}

/// Category test: a product passes iff any selected pair matches.
/// No selected pairs means the test passes vacuously.
fn passes_categories(product: &Product, criteria: &FilterCriteria) -> bool {
    if criteria.pairs().is_empty() {
        return true;
    }
    criteria.pairs().iter().any(|pair| product.in_category(pair))
}

/// Price test: a product passes iff its price falls in the active range.
/// No active range means the test passes vacuously.
fn passes_price(product: &Product, criteria: &FilterCriteria) -> bool {
    criteria
        .price_range()
        .is_none_or(|range| range.contains(product.price))
}

#[cfg(test)]
mod tests {
    use heartwood_core::{CategoryGroup, Price};

    use super::*;
    use crate::catalog::criteria::PriceRange;
    use crate::catalog::test_support::{categorized_product, product};

    #[test]
    fn test_no_criteria_is_identity() {
        let products = vec![product(1, "A", 100), product(2, "B", 200)];
        let filtered = filter_products(&products, &FilterCriteria::new());
        assert_eq!(filtered, products);
    }

    #[test]
    fn test_category_pairs_combine_with_or() {
        let chair = categorized_product(1, 100, &[(CategoryGroup::Features, "chairs")]);
        let sofa = categorized_product(2, 200, &[(CategoryGroup::Features, "sofa")]);
        let table = categorized_product(3, 300, &[(CategoryGroup::Features, "table")]);
        let products = vec![chair.clone(), sofa.clone(), table];

        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Features, "chairs");
        criteria.toggle(CategoryGroup::Features, "sofa");

        let filtered = filter_products(&products, &criteria);
        assert_eq!(filtered, vec![chair, sofa]);
    }

    #[test]
    fn test_or_spans_category_groups() {
        let chair = categorized_product(1, 100, &[(CategoryGroup::Features, "chairs")]);
        let oak_bed = categorized_product(
            2,
            200,
            &[(CategoryGroup::Features, "bed"), (CategoryGroup::Woods, "oak")],
        );
        let products = vec![chair.clone(), oak_bed.clone()];

        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Features, "chairs");
        criteria.toggle(CategoryGroup::Woods, "oak");

        // A product matching either pair passes, never requiring both
        let filtered = filter_products(&products, &criteria);
        assert_eq!(filtered, vec![chair, oak_bed]);
    }

    #[test]
    fn test_price_only_filter() {
        let products = vec![product(1, "A", 100), product(2, "B", 5000), product(3, "C", 9000)];
        let mut criteria = FilterCriteria::new();
        criteria.set_price_range(Some(PriceRange::new(
            Price::from(1000),
            Some(Price::from(8000)),
        )));

        let filtered = filter_products(&products, &criteria);
        let ids: Vec<i32> = filtered.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_category_and_price_combine_with_and() {
        let cheap_chair = categorized_product(1, 1000, &[(CategoryGroup::Features, "chairs")]);
        let mid_chair = categorized_product(2, 10000, &[(CategoryGroup::Features, "chairs")]);
        let mid_sofa = categorized_product(3, 12000, &[(CategoryGroup::Features, "sofa")]);
        let mid_table = categorized_product(4, 15000, &[(CategoryGroup::Features, "table")]);
        let products = vec![cheap_chair, mid_chair.clone(), mid_sofa.clone(), mid_table];

        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Features, "chairs");
        criteria.toggle(CategoryGroup::Features, "sofa");
        criteria.set_price_range(Some(PriceRange::new(
            Price::from(5000),
            Some(Price::from(20000)),
        )));

        // Chairs OR sofas, AND priced within [5000, 20000]
        let filtered = filter_products(&products, &criteria);
        assert_eq!(filtered, vec![mid_chair, mid_sofa]);
    }

    #[test]
    fn test_open_ended_max() {
        let products = vec![product(1, "A", 100), product(2, "B", 50000)];
        let mut criteria = FilterCriteria::new();
        criteria.set_price_range(Some(PriceRange::new(Price::from(200), None)));

        let filtered = filter_products(&products, &criteria);
        let ids: Vec<i32> = filtered.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2]);
    }
}
