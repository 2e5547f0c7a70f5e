//! Asset and product URL resolution.

use serde::{Deserialize, Serialize};

const ABSOLUTE_PREFIXES: &[&str] = &["http://", "https://", "//", "/", "data:"];

/// Default route prefix for product pages.
pub const DEFAULT_PRODUCT_BASE: &str = "/products";

/// Resolves relative asset references and product links against the theme's
/// configured bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResolver {
    /// Prefix for relative asset paths (e.g. a CDN folder). Empty means none.
    pub asset_base: String,
    /// Image used when a reference is missing.
    pub fallback_image: String,
    /// Route prefix for product pages.
    pub product_base: String,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self {
            asset_base: String::new(),
            fallback_image: String::new(),
            product_base: DEFAULT_PRODUCT_BASE.to_string(),
        }
    }
}

impl AssetResolver {
    /// Resolve an image reference.
    ///
    /// Missing or empty references become the fallback image. Absolute URLs,
    /// protocol-relative URLs, root paths and data URIs pass through; other
    /// values are prefixed with the asset base when one is configured.
    #[must_use]
    pub fn resolve_image(&self, value: Option<&str>) -> String {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return self.fallback_image.clone();
        };

        if ABSOLUTE_PREFIXES.iter().any(|p| value.starts_with(p)) || self.asset_base.is_empty() {
            return value.to_string();
        }

        format!("{}{value}", self.asset_base)
    }

    /// Resolve an optional image, keeping `None` for missing references
    /// when no fallback image is configured.
    #[must_use]
    pub fn resolve_opt_image(&self, value: Option<&str>) -> Option<String> {
        Some(self.resolve_image(value)).filter(|v| !v.is_empty())
    }

    /// Product page URL for a handle, or `#` without one.
    #[must_use]
    pub fn product_url(&self, handle: Option<&str>) -> String {
        match handle.filter(|h| !h.is_empty()) {
            Some(handle) => format!("{}/{handle}", self.product_base.trim_end_matches('/')),
            None => "#".to_string(),
        }
    }
}
