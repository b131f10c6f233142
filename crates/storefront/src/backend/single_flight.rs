//! Single-flight guard for cart quantity syncs.
//!
//! Rapid quantity-button clicks would otherwise fire overlapping network
//! calls whose responses can arrive out of order. The guard admits one
//! in-flight sync per (product, color) key; later attempts for the same
//! key are dropped while the first is still running. Dropping is safe
//! because every sync carries the absolute target quantity, not a delta.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use heartwood_core::LineKey;

/// Tracks which line keys have a sync in flight.
#[derive(Clone, Default)]
pub struct SingleFlight {
    in_flight: Arc<Mutex<HashSet<LineKey>>>,
}

impl SingleFlight {
    /// Create an empty guard set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to begin a flight for the key.
    ///
    /// Returns `None` when a flight for the same key is already running;
    /// otherwise returns a guard that releases the key on drop.
    #[must_use]
    pub fn begin(&self, key: &LineKey) -> Option<InFlight> {
        let mut set = self.lock();
        if set.contains(key) {
            return None;
        }
        set.insert(key.clone());
        Some(InFlight {
            in_flight: Arc::clone(&self.in_flight),
            key: key.clone(),
        })
    }

    /// Whether a flight is currently running for the key.
    #[must_use]
    pub fn is_in_flight(&self, key: &LineKey) -> bool {
        self.lock().contains(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<LineKey>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII token for one in-flight sync; releases its key on drop.
pub struct InFlight {
    in_flight: Arc<Mutex<HashSet<LineKey>>>,
    key: LineKey,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use heartwood_core::ProductId;

    use super::*;

    fn key(id: i32, color: Option<&str>) -> LineKey {
        LineKey::new(ProductId::new(id), color.map(String::from))
    }

    #[test]
    fn test_second_begin_for_same_key_is_dropped() {
        let guard = SingleFlight::new();
        let first = guard.begin(&key(1, None));
        assert!(first.is_some());
        assert!(guard.begin(&key(1, None)).is_none());
    }

    #[test]
    fn test_distinct_keys_fly_concurrently() {
        let guard = SingleFlight::new();
        let _a = guard.begin(&key(1, Some("Oak")));
        assert!(guard.begin(&key(1, Some("Walnut"))).is_some());
        assert!(guard.begin(&key(2, Some("Oak"))).is_some());
    }

    #[test]
    fn test_drop_releases_the_key() {
        let guard = SingleFlight::new();
        {
            let _flight = guard.begin(&key(1, None)).expect("first flight");
            assert!(guard.is_in_flight(&key(1, None)));
        }
        assert!(!guard.is_in_flight(&key(1, None)));
        assert!(guard.begin(&key(1, None)).is_some());
    }
}
