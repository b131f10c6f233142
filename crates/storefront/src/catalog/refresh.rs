//! Catalog fetch routine.
//!
//! The only writer of the product store. The server starts with an empty
//! collection; a background task performs the initial bulk fetch and swaps
//! it in when ready, falling back to the local snapshot if the backend is
//! unreachable at boot.

use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::backend::{BackendClient, BackendError};

use super::snapshot;
use super::store::ProductStore;

/// Spawn a background task for the initial catalog fetch.
///
/// Until it completes, the Shop and Search views render an empty listing.
pub fn initial_fetch_async(store: ProductStore, backend: BackendClient, snapshot_path: PathBuf) {
    info!("Spawning background catalog fetch task");
    tokio::spawn(async move {
        match refresh(&store, &backend, &snapshot_path).await {
            Ok(count) => info!(count, "Catalog ready"),
            Err(e) => {
                error!(error = %e, "Initial catalog fetch failed");
                if let Some(products) = snapshot::load(&snapshot_path) {
                    let count = products.len();
                    store.replace(products);
                    warn!(count, "Serving catalog from local snapshot");
                } else {
                    store.mark_failed();
                }
            }
        }
    });
}

/// Fetch the full collection and replace the store contents.
///
/// On success the snapshot is rewritten; on failure the store is left
/// untouched so a stale collection keeps serving until the next attempt.
///
/// # Errors
///
/// Returns the backend error when the bulk fetch fails.
#[instrument(skip_all)]
pub async fn refresh(
    store: &ProductStore,
    backend: &BackendClient,
    snapshot_path: &Path,
) -> Result<usize, BackendError> {
    let products = backend.fetch_all_products().await?;
    let count = products.len();
    snapshot::store(snapshot_path, &products);
    store.replace(products);
    Ok(count)
}

/// Re-fetch after a mutating operation (checkout), in the background.
///
/// Failures only warn: the store keeps its previous collection, which is
/// eventually consistent with the server by design.
pub fn refresh_async(store: ProductStore, backend: BackendClient, snapshot_path: PathBuf) {
    tokio::spawn(async move {
        match refresh(&store, &backend, &snapshot_path).await {
            Ok(count) => info!(count, "Catalog re-fetched"),
            Err(e) => warn!(error = %e, "Catalog re-fetch failed; keeping previous collection"),
        }
    });
}
