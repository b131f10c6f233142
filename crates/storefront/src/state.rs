//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::catalog::ProductStore;
use crate::config::StorefrontConfig;
use crate::gallery::GalleryClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the product store, and the external
/// service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    gallery: GalleryClient,
    products: ProductStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        let gallery = GalleryClient::new(&config.gallery);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                gallery,
                products: ProductStore::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the gallery client.
    #[must_use]
    pub fn gallery(&self) -> &GalleryClient {
        &self.inner.gallery
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn products(&self) -> &ProductStore {
        &self.inner.products
    }

    /// Where the catalog snapshot lives.
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.inner.config.snapshot_path
    }

    /// Owned snapshot path, for handing to background tasks.
    #[must_use]
    pub fn snapshot_path_owned(&self) -> PathBuf {
        self.inner.config.snapshot_path.clone()
    }

    /// Start the initial background catalog fetch.
    pub fn start_catalog_fetch(&self) {
        crate::catalog::refresh::initial_fetch_async(
            self.products().clone(),
            self.backend().clone(),
            self.snapshot_path_owned(),
        );
    }
}
