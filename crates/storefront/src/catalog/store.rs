//! Process-wide product store.
//!
//! Holds the raw fetched collection and its loading/error state. Populated
//! once at startup by a background task and re-fetched after mutating
//! operations (checkout). All pipeline stages read a snapshot of the
//! collection; writes go through the fetch routine and the optimistic
//! update methods only.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use heartwood_core::{Product, ProductId};

use super::criteria::PriceBounds;

/// Inner catalog state.
#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    fetch_error: bool,
    last_refreshed: Option<DateTime<Utc>>,
}

/// The product store.
///
/// Cheaply cloneable; all clones share the same collection.
#[derive(Clone, Default)]
pub struct ProductStore {
    inner: Arc<RwLock<CatalogState>>,
}

impl ProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the raw collection, in fetch order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    /// Number of products currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().products.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().products.is_empty()
    }

    /// Whether the last fetch failed.
    #[must_use]
    pub fn fetch_error(&self) -> bool {
        self.read().fetch_error
    }

    /// When the collection was last successfully replaced.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.read().last_refreshed
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.read().products.iter().find(|p| p.id == id).cloned()
    }

    /// Replace the collection wholesale after a successful fetch.
    pub fn replace(&self, products: Vec<Product>) {
        let mut state = self.write();
        state.products = products;
        state.fetch_error = false;
        state.last_refreshed = Some(Utc::now());
    }

    /// Record a failed fetch: error flag set, collection emptied.
    pub fn mark_failed(&self) {
        let mut state = self.write();
        state.fetch_error = true;
        state.products.clear();
    }

    /// Optimistic insert-or-update keyed by product id.
    pub fn upsert(&self, product: Product) {
        let mut state = self.write();
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => state.products.insert(0, product),
        }
    }

    /// Optimistic removal keyed by product id.
    pub fn remove(&self, id: ProductId) {
        self.write().products.retain(|p| p.id != id);
    }

    /// The full price bounds of the collection (the filter slider extremes).
    #[must_use]
    pub fn price_bounds(&self) -> PriceBounds {
        let state = self.read();
        let mut prices = state.products.iter().map(|p| p.price);
        let Some(first) = prices.next() else {
            return PriceBounds::default();
        };
        let (min, max) = prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        });
        PriceBounds { min, max }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
