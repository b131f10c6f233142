//! Filter criteria store.
//!
//! Holds the active filter state: an ordered set of unique
//! (group, subcategory) pairs plus an optional price range. The store holds
//! no derived data - recomputation happens through the listing pipeline.

use heartwood_core::{CategoryGroup, CategoryPair, Price};
use serde::{Deserialize, Serialize};

/// Inclusive price range; `max == None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Option<Price>,
}

impl PriceRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(min: Price, max: Option<Price>) -> Self {
        Self { min, max }
    }

    /// Whether a price falls inside the range.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }

    /// Collapse a range that spans the catalog's full price bounds to
    /// `None`, matching the UI's "drag slider back to extremes" semantics.
    #[must_use]
    pub fn normalized(self, bounds: &PriceBounds) -> Option<Self> {
        let covers_min = self.min <= bounds.min;
        let covers_max = self.max.is_none_or(|max| max >= bounds.max);
        if covers_min && covers_max {
            None
        } else {
            Some(self)
        }
    }
}

/// The full price bounds of the current catalog (the slider extremes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceBounds {
    pub min: Price,
    pub max: Price,
}

/// The active filter criteria.
///
/// Invariant: the same (group, subcategory) pair never appears twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pairs: Vec<CategoryPair>,
    price_range: Option<PriceRange>,
}

impl FilterCriteria {
    /// Empty criteria: no category pairs, no price range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected category pairs, in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[CategoryPair] {
        &self.pairs
    }

    /// The active price range, if any.
    #[must_use]
    pub const fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    /// Whether no filter is active at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.price_range.is_none()
    }

    /// Whether the given pair is currently selected.
    #[must_use]
    pub fn is_selected(&self, group: CategoryGroup, subcategory: &str) -> bool {
        self.pairs
            .iter()
            .any(|p| p.group == group && p.subcategory == subcategory)
    }

    /// Toggle a (group, subcategory) pair: remove it if present, append it
    /// otherwise. Idempotent under double-toggle.
    pub fn toggle(&mut self, group: CategoryGroup, subcategory: impl Into<String>) {
        let pair = CategoryPair::new(group, subcategory);
        if let Some(pos) = self.pairs.iter().position(|p| *p == pair) {
            self.pairs.remove(pos);
        } else {
            self.pairs.push(pair);
        }
    }

    /// Replace the price range wholesale. Callers normalize a full-bounds
    /// range to `None` via [`PriceRange::normalized`] before passing it in.
    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        self.price_range = range;
    }

    /// Empty both the category pairs and the price range.
    pub fn clear_all(&mut self) {
        self.pairs.clear();
        self.price_range = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_idempotent_under_double_toggle() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Features, "chairs");
        let after_one = criteria.clone();

        criteria.toggle(CategoryGroup::Features, "sofa");
        criteria.toggle(CategoryGroup::Features, "sofa");
        assert_eq!(criteria, after_one);

        criteria.toggle(CategoryGroup::Features, "chairs");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_pair_uniqueness() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Features, "chairs");
        criteria.toggle(CategoryGroup::Rooms, "living");
        assert_eq!(criteria.pairs().len(), 2);
        assert!(criteria.is_selected(CategoryGroup::Features, "chairs"));
        // Same subcategory under a different group is a distinct pair
        criteria.toggle(CategoryGroup::Rooms, "chairs");
        assert_eq!(criteria.pairs().len(), 3);
    }

    #[test]
    fn test_clear_all() {
        let mut criteria = FilterCriteria::new();
        criteria.toggle(CategoryGroup::Woods, "oak");
        criteria.set_price_range(Some(PriceRange::new(Price::from(100), None)));
        criteria.clear_all();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_price_range_contains() {
        let range = PriceRange::new(Price::from(5000), Some(Price::from(20000)));
        assert!(range.contains(Price::from(5000)));
        assert!(range.contains(Price::from(12000)));
        assert!(range.contains(Price::from(20000)));
        assert!(!range.contains(Price::from(4999)));
        assert!(!range.contains(Price::from(20001)));

        let open = PriceRange::new(Price::from(5000), None);
        assert!(open.contains(Price::from(1_000_000)));
        assert!(!open.contains(Price::from(4999)));
    }

    #[test]
    fn test_full_bounds_range_normalizes_to_none() {
        let bounds = PriceBounds {
            min: Price::from(100),
            max: Price::from(9000),
        };
        let full = PriceRange::new(Price::from(100), Some(Price::from(9000)));
        assert_eq!(full.normalized(&bounds), None);

        let narrower = PriceRange::new(Price::from(200), Some(Price::from(9000)));
        assert_eq!(narrower.normalized(&bounds), Some(narrower));

        let open_from_floor = PriceRange::new(Price::from(100), None);
        assert_eq!(open_from_floor.normalized(&bounds), None);
    }
}
