//! Catalog backend API client.
//!
//! Typed JSON-over-HTTP access to the external product service: bulk
//! product fetch, order placement, token validation, and cart quantity
//! sync. Wire shapes live in [`types`] and are validated into domain
//! types here; the rest of the storefront never sees raw payloads.

mod single_flight;
pub mod types;

use std::sync::Arc;

use heartwood_core::{LineKey, Product};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::BackendConfig;

pub use single_flight::{InFlight, SingleFlight};
use types::{QuantitySync, TokenValidity};
pub use types::{OrderLine, OrderPayload, OrderReceipt, WireProduct};

/// Errors from the backend API boundary.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    /// The response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a cart quantity sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The new quantity reached the backend.
    Synced,
    /// A sync for the same (product, color) was already in flight; this
    /// one was dropped.
    Dropped,
}

/// Client for the catalog backend.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: SecretString,
    sync_guard: SingleFlight,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                sync_guard: SingleFlight::new(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        // Url::join would resolve against the last path segment; extend instead
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.inner.api_token.expose_secret())
    }

    /// Fetch the full product collection.
    ///
    /// Products that fail boundary validation are skipped with a warning
    /// rather than failing the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, unexpected status, or an
    /// unparseable body.
    #[instrument(skip(self))]
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, BackendError> {
        let response = self
            .authorized(self.inner.client.get(self.endpoint("products")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;
        let wire: Vec<WireProduct> = match serde_json::from_str(&response_text) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse product collection"
                );
                return Err(BackendError::Parse(e));
            }
        };
        let total = wire.len();

        let products: Vec<Product> = wire
            .into_iter()
            .filter_map(|w| match Product::try_from(w) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid product from backend");
                    None
                }
            })
            .collect();

        debug!(total, kept = products.len(), "Fetched product collection");
        Ok(products)
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, payload))]
    pub async fn place_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, BackendError> {
        let response = self
            .authorized(self.inner.client.post(self.endpoint("orders")))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        Ok(response.json().await?)
    }

    /// Check whether a customer token is still valid.
    ///
    /// A 401 from the backend means "invalid", not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status.
    #[instrument(skip(self, token))]
    pub async fn check_token_validity(&self, token: &str) -> Result<bool, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("auth/validate"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(false),
            status if status.is_success() => {
                let validity: TokenValidity = response.json().await?;
                Ok(validity.valid)
            }
            status => Err(BackendError::Status(status)),
        }
    }

    /// Sync a line's absolute quantity to the backend, single-flight per
    /// (product, color) key.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn sync_cart_quantity(
        &self,
        key: &LineKey,
        quantity: u32,
        wood_type: Option<&str>,
    ) -> Result<SyncOutcome, BackendError> {
        let Some(_flight) = self.inner.sync_guard.begin(key) else {
            debug!(product_id = %key.product_id, "Quantity sync already in flight; dropping");
            return Ok(SyncOutcome::Dropped);
        };

        let body = QuantitySync {
            product_id: key.product_id,
            color: key.color.as_deref(),
            wood_type,
            quantity,
        };

        let response = self
            .authorized(self.inner.client.put(self.endpoint("cart/quantity")))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        Ok(SyncOutcome::Synced)
    }
}
