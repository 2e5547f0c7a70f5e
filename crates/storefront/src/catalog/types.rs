//! Site data document types.

use std::collections::HashMap;

use cozyspot_core::types::de::{map_or_empty, opt_string_or_number, vec_or_empty};
use cozyspot_core::{AssetResolver, ProductRecord, Ratings};
use serde::{Deserialize, Serialize};

/// Handle value used in site data for "no product".
const NO_PRODUCT_HANDLE: &str = "#";

/// Returns `true` if a handle refers to a product (not empty, not `#`).
#[must_use]
pub fn is_product_handle(handle: &str) -> bool {
    let handle = handle.trim();
    !handle.is_empty() && handle != NO_PRODUCT_HANDLE
}

/// The full site data document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteData {
    #[serde(default)]
    pub shopify_config: Option<ShopifySiteConfig>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub gallery_scenes: Vec<Scene>,
    /// Product page fallbacks keyed by handle.
    #[serde(default, deserialize_with = "map_or_empty")]
    pub product_details: HashMap<String, ProductReference>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub featured_products: Vec<ProductReference>,
    /// Global ratings lookup keyed by product ID.
    #[serde(default)]
    pub product_ratings: Ratings,
}

/// Platform settings bundled with the site data.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default, Deserialize)]
pub struct ShopifySiteConfig {
    #[serde(default)]
    pub store_domain: Option<String>,
    #[serde(default)]
    pub storefront_access_token: Option<String>,
}

impl std::fmt::Debug for ShopifySiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifySiteConfig")
            .field("store_domain", &self.store_domain)
            .field(
                "storefront_access_token",
                &self.storefront_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// A room or setting with shoppable hotspots.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub hotspots: Vec<Hotspot>,
    /// Curated products shown instead of hotspot products when present.
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub inventory: Vec<ProductRecord>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub products: Vec<ProductRecord>,
}

/// Listing entry for a scene.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub hotspot_count: usize,
}

impl From<&Scene> for SceneSummary {
    fn from(scene: &Scene) -> Self {
        Self {
            id: scene.id.clone(),
            title: scene.title.clone(),
            image: scene.image.clone(),
            category: scene.category.clone(),
            hotspot_count: scene.hotspots.len(),
        }
    }
}

impl Scene {
    /// Returns `true` if any hotspot references the handle.
    #[must_use]
    pub fn features(&self, handle: &str) -> bool {
        self.hotspots
            .iter()
            .any(|h| h.shopify_handle.as_deref() == Some(handle))
    }
}

/// Position of a hotspot over its scene image, in CSS units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotPosition {
    pub top: Option<String>,
    pub left: Option<String>,
}

/// A positioned marker referencing a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hotspot {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "y", deserialize_with = "opt_string_or_number")]
    pub top: Option<String>,
    #[serde(default, alias = "x", deserialize_with = "opt_string_or_number")]
    pub left: Option<String>,
    #[serde(default)]
    pub shopify_handle: Option<String>,
    #[serde(default)]
    pub fallback: Option<ProductRecord>,
    /// Product fields written directly on the hotspot.
    #[serde(flatten)]
    pub embedded: ProductRecord,
}

impl Hotspot {
    /// The hotspot's position.
    #[must_use]
    pub fn position(&self) -> HotspotPosition {
        HotspotPosition {
            top: self.top.clone(),
            left: self.left.clone(),
        }
    }

    /// The product handle, if the hotspot references a product.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.shopify_handle
            .as_deref()
            .map(str::trim)
            .filter(|h| is_product_handle(h))
    }

    /// Bundled product data: fallback fields over embedded fields.
    ///
    /// Returns `None` when the hotspot carries no fallback block and no
    /// named embedded product.
    #[must_use]
    pub fn fallback_product(&self) -> Option<ProductRecord> {
        match &self.fallback {
            Some(fallback) => Some(self.embedded.clone().overlay(fallback.clone())),
            None if self.embedded.has_name() => Some(self.embedded.clone()),
            None => None,
        }
    }
}

/// A handle plus fallback fields, used by product pages and featured lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductReference {
    #[serde(default)]
    pub shopify_handle: Option<String>,
    #[serde(default)]
    pub fallback: Option<ProductRecord>,
}

impl ProductReference {
    /// Fallback fields with the reference's handle filled in.
    #[must_use]
    pub fn fallback_product(&self) -> Option<ProductRecord> {
        self.fallback.clone().map(|mut product| {
            if product.handle.is_none() {
                product.handle.clone_from(&self.shopify_handle);
            }
            product
        })
    }
}

impl SiteData {
    /// Find a scene by ID, then by title.
    ///
    /// IDs and titles share one lookup key; an ID match always wins, and the
    /// first scene in document order wins among equal matches.
    #[must_use]
    pub fn find_scene(&self, key: &str) -> Option<&Scene> {
        self.gallery_scenes
            .iter()
            .find(|s| s.id.as_deref() == Some(key))
            .or_else(|| {
                self.gallery_scenes
                    .iter()
                    .find(|s| s.title.as_deref() == Some(key))
            })
    }

    /// Scenes with a hotspot referencing the handle.
    pub fn scenes_featuring<'a>(&'a self, handle: &'a str) -> impl Iterator<Item = &'a Scene> {
        self.gallery_scenes.iter().filter(move |s| s.features(handle))
    }

    /// Rewrite every image reference through the asset resolver.
    pub fn resolve_assets(&mut self, assets: &AssetResolver) {
        for scene in &mut self.gallery_scenes {
            if let Some(image) = scene.image.take() {
                scene.image = assets.resolve_opt_image(Some(&image));
            }
            for hotspot in &mut scene.hotspots {
                hotspot.embedded.resolve_assets(assets);
                if let Some(fallback) = hotspot.fallback.as_mut() {
                    fallback.resolve_assets(assets);
                }
            }
            for product in scene.inventory.iter_mut().chain(scene.products.iter_mut()) {
                product.resolve_assets(assets);
            }
        }

        let references = self
            .product_details
            .values_mut()
            .chain(self.featured_products.iter_mut());
        for reference in references {
            if let Some(fallback) = reference.fallback.as_mut() {
                fallback.resolve_assets(assets);
            }
        }
    }
}
