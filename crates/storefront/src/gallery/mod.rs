//! Cloudinary-backed media gallery client.
//!
//! Fetches tagged image lists from Cloudinary's client-side list API and
//! caches them with `moka` (1-hour TTL). Failures degrade to an empty
//! gallery; the storefront stays interactive.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::GalleryConfig;

/// Cache TTL for gallery listings.
const GALLERY_TTL: Duration = Duration::from_secs(3600);

/// Errors from the gallery boundary.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// One gallery image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub public_id: String,
    pub format: String,
    pub version: u64,
}

impl GalleryImage {
    /// Delivery URL for this image.
    #[must_use]
    pub fn url(&self, cloud_name: &str) -> String {
        format!(
            "https://res.cloudinary.com/{cloud_name}/image/upload/v{}/{}.{}",
            self.version, self.public_id, self.format
        )
    }
}

/// Cloudinary list API response.
#[derive(Debug, Deserialize)]
struct ListResponse {
    resources: Vec<ListResource>,
}

#[derive(Debug, Deserialize)]
struct ListResource {
    public_id: String,
    format: String,
    version: u64,
}

/// Client for the Cloudinary gallery.
///
/// Cheaply cloneable; all clones share the cache.
#[derive(Clone)]
pub struct GalleryClient {
    inner: Arc<GalleryClientInner>,
}

struct GalleryClientInner {
    client: reqwest::Client,
    cloud_name: String,
    cache: Cache<String, Arc<Vec<GalleryImage>>>,
}

impl GalleryClient {
    /// Create a new gallery client.
    #[must_use]
    pub fn new(config: &GalleryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(32)
            .time_to_live(GALLERY_TTL)
            .build();

        Self {
            inner: Arc::new(GalleryClientInner {
                client: reqwest::Client::new(),
                cloud_name: config.cloud_name.clone(),
                cache,
            }),
        }
    }

    /// The configured Cloudinary cloud name.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.inner.cloud_name
    }

    /// Images for a tag, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status;
    /// callers degrade to an empty gallery.
    #[instrument(skip(self))]
    pub async fn images_for_tag(&self, tag: &str) -> Result<Arc<Vec<GalleryImage>>, GalleryError> {
        if let Some(cached) = self.inner.cache.get(tag).await {
            debug!(tag, count = cached.len(), "Gallery cache hit");
            return Ok(cached);
        }

        let images = Arc::new(self.fetch_tag(tag).await?);
        self.inner.cache.insert(tag.to_string(), Arc::clone(&images)).await;
        Ok(images)
    }

    async fn fetch_tag(&self, tag: &str) -> Result<Vec<GalleryImage>, GalleryError> {
        let url = format!(
            "https://res.cloudinary.com/{}/image/list/{tag}.json",
            self.inner.cloud_name
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(tag, %status, "Cloudinary list request failed");
            return Err(GalleryError::Status(status));
        }

        let list: ListResponse = response.json().await?;
        debug!(tag, count = list.resources.len(), "Fetched gallery listing");

        Ok(list
            .resources
            .into_iter()
            .map(|r| GalleryImage {
                public_id: r.public_id,
                format: r.format,
                version: r.version,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_url() {
        let image = GalleryImage {
            public_id: "showroom/oak-table".to_string(),
            format: "jpg".to_string(),
            version: 17,
        };
        assert_eq!(
            image.url("heartwood"),
            "https://res.cloudinary.com/heartwood/image/upload/v17/showroom/oak-table.jpg"
        );
    }
}
