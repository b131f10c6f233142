//! Local snapshot of the last successful catalog fetch.
//!
//! The snapshot is a best-effort boot fallback, not a durability
//! guarantee: it is rewritten after every successful fetch and read only
//! when the initial fetch fails.

use std::path::Path;

use heartwood_core::Product;
use tracing::{debug, warn};

/// Load the snapshot, if one exists and parses.
#[must_use]
pub fn load(path: &Path) -> Option<Vec<Product>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to read catalog snapshot");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(products) => {
            debug!(path = %path.display(), "Loaded catalog snapshot");
            Some(products)
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to parse catalog snapshot");
            None
        }
    }
}

/// Persist the products as the new snapshot. Failures are logged, never
/// fatal.
pub fn store(path: &Path, products: &[Product]) {
    let json = match serde_json::to_vec(products) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Failed to serialize catalog snapshot");
            return;
        }
    };

    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(error = %e, path = %path.display(), "Failed to create snapshot directory");
        return;
    }

    if let Err(e) = std::fs::write(path, json) {
        warn!(error = %e, path = %path.display(), "Failed to write catalog snapshot");
    } else {
        debug!(count = products.len(), path = %path.display(), "Wrote catalog snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("catalog.json");

        assert_eq!(load(&path), None);

        let products = vec![product(1, "Armchair", 1000), product(2, "Stool", 200)];
        store(&path, &products);
        assert_eq!(load(&path), Some(products));
    }

    #[test]
    fn test_corrupt_snapshot_is_ignored() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, b"not json").expect("write file");
        assert_eq!(load(&path), None);
    }
}
