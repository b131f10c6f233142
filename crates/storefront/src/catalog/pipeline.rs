//! The derived product-listing pipeline.
//!
//! Data flow is strictly one-directional: raw -> (searched) -> sorted ->
//! filtered -> paginated. A single [`recompute`] entry point chains the
//! stages in fixed dependency order, so they can never run out of order.
//! [`ListingState`] holds the inputs (sort, criteria, page, query) and is
//! kept per session, per view; every filter or sort mutation resets the
//! page to 1.

use heartwood_core::{CategoryGroup, Product};
use serde::{Deserialize, Serialize};

use super::criteria::{FilterCriteria, PriceRange};
use super::filter::filter_products;
use super::paginate::paginate;
use super::sort::{SortOrder, sort_products};

/// Products per page, shared by the Shop and Search views.
pub const PRODUCTS_PER_PAGE: usize = 10;

/// The view a listing state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Shop,
    Search,
}

impl ViewKind {
    /// The route path for this view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Shop => "/shop",
            Self::Search => "/search",
        }
    }

    /// Parse from a form or URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shop" => Some(Self::Shop),
            "search" => Some(Self::Search),
            _ => None,
        }
    }

    /// Convert to a form or URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Search => "search",
        }
    }
}

/// Listing inputs held per session and per view.
///
/// Stale filters never leak between Shop and Search: a request for a
/// different view than the stored one starts from a fresh state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingState {
    view: ViewKind,
    sort: SortOrder,
    criteria: FilterCriteria,
    page: usize,
    /// Search query; always empty for the Shop view.
    query: String,
}

impl ListingState {
    /// Fresh state for a view: default sort, no filters, page 1.
    #[must_use]
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            sort: SortOrder::default(),
            criteria: FilterCriteria::new(),
            page: 1,
            query: String::new(),
        }
    }

    /// Route-change reset: reuse the state when the view matches, start
    /// fresh when it does not.
    #[must_use]
    pub fn for_view(self, view: ViewKind) -> Self {
        if self.view == view { self } else { Self::new(view) }
    }

    /// The view this state belongs to.
    #[must_use]
    pub const fn view(&self) -> ViewKind {
        self.view
    }

    /// The active sort criterion.
    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    /// The active filter criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The requested 1-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// The search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the sort criterion. Resets the page to 1 when it changes.
    pub fn set_sort(&mut self, sort: SortOrder) {
        if self.sort != sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    /// Toggle a category pair. Resets the page to 1.
    pub fn toggle_pair(&mut self, group: CategoryGroup, subcategory: impl Into<String>) {
        self.criteria.toggle(group, subcategory);
        self.page = 1;
    }

    /// Replace the price range. Resets the page to 1.
    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        self.criteria.set_price_range(range);
        self.page = 1;
    }

    /// Clear all filters. Resets the page to 1.
    pub fn clear_filters(&mut self) {
        self.criteria.clear_all();
        self.page = 1;
    }

    /// Jump to a page (user clicked a page button).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the search query. Resets the page to 1 when it changes.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.query != query {
            self.query = query;
            self.page = 1;
        }
    }
}

/// Materialized outputs of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Output of the sort stage (after the search pre-filter, if any).
    pub sorted: Vec<Product>,
    /// Output of the filter stage.
    pub filtered: Vec<Product>,
    /// The current page window.
    pub page_items: Vec<Product>,
    /// Total number of pages of the filtered collection.
    pub page_count: usize,
    /// The effective page after clamping into `[1, max(page_count, 1)]`.
    pub page: usize,
}

/// Run the full cascade over the raw collection.
///
/// The requested page is clamped here - not in the pagination stage - so a
/// state pointing past the end of a freshly narrowed result set lands on
/// the last non-empty page instead of an empty one.
#[must_use]
pub fn recompute(products: &[Product], state: &ListingState) -> Listing {
    let searched = search_subset(products, state.query());
    let sorted = sort_products(&searched, state.sort());
    let filtered = filter_products(&sorted, state.criteria());

    let page_count = filtered.len().div_ceil(PRODUCTS_PER_PAGE);
    let page = state.page().clamp(1, page_count.max(1));
    let window = paginate(&filtered, PRODUCTS_PER_PAGE, page);

    Listing {
        sorted,
        filtered,
        page_items: window.items,
        page_count: window.page_count,
        page,
    }
}

/// Case-insensitive title-substring pre-filter applied by the Search view
/// before the shared cascade. An empty query passes the collection through.
fn search_subset(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use heartwood_core::Price;

    use super::*;
    use crate::catalog::test_support::{categorized_product, product};

    fn collection(n: i32) -> Vec<Product> {
        (1..=n)
            .map(|i| product(i, &format!("Piece {i}"), i64::from(i) * 100))
            .collect()
    }

    #[test]
    fn test_recompute_chains_stages_in_order() {
        // 25 products, price ascending, page 2 -> the 11th-20th cheapest
        let mut products = collection(25);
        products.reverse(); // fetch order is by descending price now

        let mut state = ListingState::new(ViewKind::Shop);
        state.set_sort(SortOrder::PriceAsc);
        state.set_page(2);

        let listing = recompute(&products, &state);
        assert_eq!(listing.page_count, 3);
        let ids: Vec<i32> = listing.page_items.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<i32>>());
    }

    #[test]
    fn test_filter_mutation_resets_page() {
        let mut state = ListingState::new(ViewKind::Shop);
        state.set_page(3);
        state.toggle_pair(CategoryGroup::Features, "chairs");
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_price_range(Some(PriceRange::new(Price::from(100), None)));
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_sort(SortOrder::NameAsc);
        assert_eq!(state.page(), 1);

        // Re-applying the same sort is not a change and keeps the page
        state.set_page(2);
        state.set_sort(SortOrder::NameAsc);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_recompute_clamps_stale_page() {
        let products = collection(25);
        let mut state = ListingState::new(ViewKind::Shop);
        state.set_page(3);

        // Narrow to a single page while the state still points at page 3
        state.criteria.toggle(CategoryGroup::Features, "chairs");
        state.page = 3;
        let chairs: Vec<Product> = vec![
            categorized_product(100, 500, &[(CategoryGroup::Features, "chairs")]),
            categorized_product(101, 600, &[(CategoryGroup::Features, "chairs")]),
        ];
        let mut all = products;
        all.extend(chairs);

        let listing = recompute(&all, &state);
        assert_eq!(listing.page_count, 1);
        assert_eq!(listing.page, 1);
        assert_eq!(listing.page_items.len(), 2);
    }

    #[test]
    fn test_view_change_resets_state() {
        let mut state = ListingState::new(ViewKind::Shop);
        state.toggle_pair(CategoryGroup::Woods, "oak");
        state.set_sort(SortOrder::PriceDesc);

        let carried = state.clone().for_view(ViewKind::Shop);
        assert_eq!(carried, state);

        let reset = state.for_view(ViewKind::Search);
        assert_eq!(reset, ListingState::new(ViewKind::Search));
    }

    #[test]
    fn test_search_prefilter_is_case_insensitive_substring() {
        let products = vec![
            product(1, "Walnut Armchair", 100),
            product(2, "Oak Table", 200),
            product(3, "ARMOIRE", 300),
        ];
        let mut state = ListingState::new(ViewKind::Search);
        state.set_query("arm");

        let listing = recompute(&products, &state);
        let ids: Vec<i32> = listing.sorted.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_searched_subset_follows_the_same_cascade() {
        let products = vec![
            product(1, "Chair Alpha", 900),
            product(2, "Chair Beta", 100),
            product(3, "Stool", 200),
            product(4, "Chair Gamma", 500),
        ];
        let mut state = ListingState::new(ViewKind::Search);
        state.set_query("chair");
        state.set_sort(SortOrder::PriceAsc);

        let listing = recompute(&products, &state);
        let ids: Vec<i32> = listing.page_items.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let state = ListingState::new(ViewKind::Shop);
        let listing = recompute(&[], &state);
        assert_eq!(listing.page_count, 0);
        assert!(listing.page_items.is_empty());
        assert_eq!(listing.page, 1);
    }
}
