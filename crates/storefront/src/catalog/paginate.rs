//! Pagination stage of the listing pipeline.
//!
//! Pure slicing: page numbers are driven by user interaction and this
//! stage never self-corrects an out-of-range page - an out-of-range page
//! simply yields an empty window. Clamping is the orchestrator's job.

use heartwood_core::Product;

/// One page window of a filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    /// The products on the requested page.
    pub items: Vec<Product>,
    /// `ceil(filtered length / page size)`; 0 for an empty collection.
    pub page_count: usize,
}

/// Slice the `[(page - 1) * size, page * size)` window out of a filtered
/// collection.
///
/// `page` is 1-based; page 0 is treated as an out-of-range page.
#[must_use]
pub fn paginate(products: &[Product], page_size: usize, page: usize) -> PageWindow {
    let page_count = products.len().div_ceil(page_size.max(1));

    let items = if page == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(page_size);
        products
            .get(start..products.len().min(start + page_size))
            .map(<[Product]>::to_vec)
            .unwrap_or_default()
    };

    PageWindow { items, page_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;

    fn collection(n: usize) -> Vec<Product> {
        (1..=n)
            .map(|i| {
                let i = i32::try_from(i).expect("small collection");
                product(i, &format!("P{i}"), i64::from(i) * 10)
            })
            .collect()
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(paginate(&collection(25), 10, 1).page_count, 3);
        assert_eq!(paginate(&collection(30), 10, 1).page_count, 3);
        assert_eq!(paginate(&collection(1), 10, 1).page_count, 1);
        assert_eq!(paginate(&[], 10, 1).page_count, 0);
    }

    #[test]
    fn test_window_slicing() {
        let products = collection(25);
        let second = paginate(&products, 10, 2);
        let ids: Vec<i32> = second.items.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<i32>>());

        let last = paginate(&products, 10, 3);
        assert_eq!(last.items.len(), 5);
    }

    #[test]
    fn test_pages_partition_the_collection() {
        let products = collection(25);
        let page_count = paginate(&products, 10, 1).page_count;

        let mut reassembled = Vec::new();
        for page in 1..=page_count {
            let window = paginate(&products, 10, page);
            // Every page except possibly the last is exactly full
            if page < page_count {
                assert_eq!(window.items.len(), 10);
            }
            reassembled.extend(window.items);
        }
        assert_eq!(reassembled, products);
    }

    #[test]
    fn test_out_of_range_page_yields_empty_window() {
        let products = collection(5);
        let window = paginate(&products, 10, 3);
        assert!(window.items.is_empty());
        assert_eq!(window.page_count, 1);

        assert!(paginate(&products, 10, 0).items.is_empty());
    }
}
