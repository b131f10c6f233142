//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HEARTWOOD_API_URL` - Base URL of the catalog backend API
//! - `HEARTWOOD_API_TOKEN` - Service token for the backend API
//! - `CLOUDINARY_CLOUD_NAME` - Cloudinary cloud for the media gallery
//!
//! ## Optional
//! - `HEARTWOOD_HOST` - Bind address (default: 127.0.0.1)
//! - `HEARTWOOD_PORT` - Listen port (default: 3000)
//! - `HEARTWOOD_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `CLOUDINARY_GALLERY_TAG` - Gallery tag to list (default: showroom)
//! - `HEARTWOOD_SNAPSHOT_PATH` - Catalog snapshot file
//!   (default: data/catalog.json)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog backend API configuration
    pub backend: BackendConfig,
    /// Cloudinary gallery configuration
    pub gallery: GalleryConfig,
    /// Where the last successful catalog fetch is snapshotted
    pub snapshot_path: PathBuf,
}

/// Catalog backend API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API
    pub base_url: Url,
    /// Service token sent as a bearer header
    pub api_token: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Cloudinary gallery configuration.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Cloudinary cloud name
    pub cloud_name: String,
    /// Tag whose images make up the gallery
    pub tag: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HEARTWOOD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HEARTWOOD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("HEARTWOOD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HEARTWOOD_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("HEARTWOOD_BASE_URL", "http://localhost:3000");

        let backend = BackendConfig::from_env()?;
        let gallery = GalleryConfig::from_env()?;

        let snapshot_path =
            PathBuf::from(get_env_or_default("HEARTWOOD_SNAPSHOT_PATH", "data/catalog.json"));

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            gallery,
            snapshot_path,
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("HEARTWOOD_API_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("HEARTWOOD_API_URL".to_string(), e.to_string())
        })?;
        let api_token = SecretString::from(get_required_env("HEARTWOOD_API_TOKEN")?);

        Ok(Self {
            base_url,
            api_token,
        })
    }
}

impl GalleryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: get_required_env("CLOUDINARY_CLOUD_NAME")?,
            tag: get_env_or_default("CLOUDINARY_GALLERY_TAG", "showroom"),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get an environment variable with a default fallback.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_debug_redacts_token() {
        let config = BackendConfig {
            base_url: Url::parse("http://api.example.com").expect("valid url"),
            api_token: SecretString::from("super-secret"),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().expect("valid ip"),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            backend: BackendConfig {
                base_url: Url::parse("http://api.example.com").expect("valid url"),
                api_token: SecretString::from("token"),
            },
            gallery: GalleryConfig {
                cloud_name: "heartwood".to_string(),
                tag: "showroom".to_string(),
            },
            snapshot_path: PathBuf::from("data/catalog.json"),
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
