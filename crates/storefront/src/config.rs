//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_URL` - Site data document, path or http(s) URL (default: data.json)
//! - `STOREFRONT_ASSET_BASE` - Prefix for relative image paths
//! - `STOREFRONT_FALLBACK_IMAGE` - Image used when a product has none
//! - `STOREFRONT_PRODUCT_BASE` - Product page route prefix (default: /products)
//! - `STOREFRONT_CURRENCY` - Currency of public product JSON prices (default: USD)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API access token
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_SHOP_ORIGIN` - Origin for public product and cart endpoints
//!   (default: `https://{SHOPIFY_STORE}`)
//! - `SHOPIFY_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! The store domain and token may also come from the `shopify_config` block of
//! the site data document; environment values take precedence.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use cozyspot_core::AssetResolver;
use cozyspot_core::types::asset::DEFAULT_PRODUCT_BASE;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::catalog::ShopifySiteConfig;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your_",
    "your-",
    "paste",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "enter_",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Site data document location (file path or http(s) URL)
    pub data_url: String,
    /// Asset and product URL resolution
    pub assets: AssetResolver,
    /// ISO 4217 code assumed for public product JSON prices
    pub default_currency: String,
    /// Shopify API configuration
    pub shopify: ShopifyConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Shopify API configuration from the environment.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: Option<String>,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Storefront API access token
    pub storefront_token: Option<SecretString>,
    /// Origin serving `/products/{handle}.js` and the AJAX cart
    pub shop_origin: Option<String>,
    /// Timeout applied to every upstream request
    pub timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field(
                "storefront_token",
                &self.storefront_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("shop_origin", &self.shop_origin)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Credentials for the Storefront GraphQL API.
#[derive(Clone)]
pub struct StorefrontCredentials {
    /// Shopify store domain
    pub store: String,
    /// Shopify API version
    pub api_version: String,
    /// Validated access token
    pub token: SecretString,
}

impl std::fmt::Debug for StorefrontCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontCredentials")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Resolved platform access: which product API to use and where the
/// public endpoints live.
#[derive(Debug, Clone, Default)]
pub struct ShopifyAccess {
    /// Present when a usable storefront token is configured
    pub storefront: Option<StorefrontCredentials>,
    /// Origin for public product JSON and the AJAX cart
    pub shop_origin: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_url: "data.json".to_string(),
            assets: AssetResolver::default(),
            default_currency: "USD".to_string(),
            shopify: ShopifyConfig::default(),
            sentry_dsn: None,
        }
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            store: None,
            api_version: "2024-01".to_string(),
            storefront_token: None,
            shop_origin: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let assets = AssetResolver {
            asset_base: get_env_or_default("STOREFRONT_ASSET_BASE", ""),
            fallback_image: get_env_or_default("STOREFRONT_FALLBACK_IMAGE", ""),
            product_base: get_env_or_default("STOREFRONT_PRODUCT_BASE", DEFAULT_PRODUCT_BASE),
        };

        Ok(Self {
            host,
            port,
            data_url: get_env_or_default("STOREFRONT_DATA_URL", "data.json"),
            assets,
            default_currency: get_env_or_default("STOREFRONT_CURRENCY", "USD"),
            shopify: ShopifyConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("SHOPIFY_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            store: get_optional_env("SHOPIFY_STORE"),
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-01"),
            storefront_token: get_optional_env("SHOPIFY_STOREFRONT_TOKEN").map(SecretString::from),
            shop_origin: get_optional_env("SHOPIFY_SHOP_ORIGIN")
                .map(|origin| parse_origin(&origin))
                .transpose()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_SHOP_ORIGIN".to_string(), e))?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Combine environment settings with the site data's `shopify_config`.
    ///
    /// Environment values win. A token that is empty or looks like a
    /// placeholder is dropped here, once, and the storefront runs against the
    /// public product endpoint instead.
    #[must_use]
    pub fn resolve(&self, site: Option<&ShopifySiteConfig>) -> ShopifyAccess {
        let store = self
            .store
            .clone()
            .or_else(|| site.and_then(|s| s.store_domain.clone()))
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let token = self
            .storefront_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .or_else(|| site.and_then(|s| s.storefront_access_token.clone()));

        let token = token.and_then(|t| match validate_token(&t) {
            Ok(()) => Some(SecretString::from(t)),
            Err(reason) => {
                tracing::warn!(reason = %reason, "Ignoring storefront token");
                None
            }
        });

        let storefront = match (store.clone(), token) {
            (Some(store), Some(token)) => Some(StorefrontCredentials {
                store,
                api_version: self.api_version.clone(),
                token,
            }),
            (None, Some(_)) => {
                tracing::warn!("Storefront token configured without a store domain");
                None
            }
            _ => None,
        };

        let shop_origin = self
            .shop_origin
            .clone()
            .or_else(|| store.map(|s| format!("https://{s}")))
            .map(|o| o.trim_end_matches('/').to_string());

        ShopifyAccess {
            storefront,
            shop_origin,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate an http(s) origin and drop any trailing slash.
fn parse_origin(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!("expected an http(s) origin, got {value}"));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Token length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a token is not blank, not a placeholder, and looks random.
fn validate_token(token: &str) -> Result<(), String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err("token is empty".to_string());
    }

    let lower = trimmed.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(trimmed);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}
