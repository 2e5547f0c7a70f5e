//! Product resolution merge.
//!
//! A product is resolved from, in order:
//!
//! 1. the [`ProductCache`];
//! 2. the live [`ProductSource`] (Storefront GraphQL or public product JSON);
//! 3. bundled fallback fields from the site data.
//!
//! The first source that yields a product wins. Live failures are logged at
//! `warn` and treated as "source unavailable"; they never surface as errors.
//! Hotspot positions are carried beside the resolution, so product data can
//! never move a hotspot.

mod cache;
mod source;

use std::sync::Arc;

use cozyspot_core::{AssetResolver, DisplayProduct, ProductRecord};
use futures::future::join_all;
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{
    Hotspot, HotspotPosition, ProductReference, Scene, SceneSummary, SiteData, is_product_handle,
};

pub use cache::ProductCache;
pub use source::{LiveSource, ProductSource};

/// Related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 6;

/// Outcome of resolving one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "product", rename_all = "lowercase")]
pub enum Resolution {
    /// Live platform data (possibly from cache).
    Shopify(ProductRecord),
    /// Bundled site data.
    Fallback(ProductRecord),
    /// Nothing to show.
    #[serde(rename = "none")]
    Missing,
}

impl Resolution {
    fn from_fallback(product: Option<ProductRecord>) -> Self {
        product.map_or(Self::Missing, Self::Fallback)
    }

    /// The serialized `kind` tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Shopify(_) => "shopify",
            Self::Fallback(_) => "fallback",
            Self::Missing => "none",
        }
    }

    #[must_use]
    pub const fn product(&self) -> Option<&ProductRecord> {
        match self {
            Self::Shopify(p) | Self::Fallback(p) => Some(p),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub fn into_product(self) -> Option<ProductRecord> {
        match self {
            Self::Shopify(p) | Self::Fallback(p) => Some(p),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A hotspot with its product resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedHotspot {
    pub id: Option<String>,
    /// Always the hotspot's own position.
    #[serde(flatten)]
    pub position: HotspotPosition,
    pub shopify_handle: Option<String>,
    pub resolution: Resolution,
    pub display: Option<DisplayProduct>,
}

/// A scene with every hotspot resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedScene {
    pub id: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub hotspots: Vec<ResolvedHotspot>,
}

/// Resolves products for scenes, hotspots and product pages.
///
/// Cheap to clone; clones share the cache and site data.
pub struct ProductResolver<S = LiveSource> {
    inner: Arc<ResolverInner<S>>,
}

struct ResolverInner<S> {
    source: S,
    cache: ProductCache,
    site: Arc<SiteData>,
    assets: AssetResolver,
}

impl<S> Clone for ProductResolver<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for ProductResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductResolver")
            .field("cache", &self.inner.cache)
            .field("scenes", &self.inner.site.gallery_scenes.len())
            .finish_non_exhaustive()
    }
}

impl<S: ProductSource> ProductResolver<S> {
    /// Create a resolver over a live source and loaded site data.
    #[must_use]
    pub fn new(source: S, site: Arc<SiteData>, assets: AssetResolver) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                source,
                cache: ProductCache::new(),
                site,
                assets,
            }),
        }
    }

    #[must_use]
    pub fn site(&self) -> &SiteData {
        &self.inner.site
    }

    #[must_use]
    pub fn cache(&self) -> &ProductCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Build the display model for a record.
    #[must_use]
    pub fn display(&self, product: &ProductRecord) -> DisplayProduct {
        DisplayProduct::from_record(product, &self.inner.site.product_ratings, &self.inner.assets)
    }

    /// Cached or live product summary. Failures are logged and yield `None`.
    ///
    /// Concurrent lookups of one handle share a single live fetch.
    async fn fetch_live(&self, handle: &str) -> Option<ProductRecord> {
        if let Some(product) = self.inner.cache.get(handle).await {
            tracing::debug!(handle, "Product cache hit");
            return Some(product);
        }

        let load = async {
            match self.inner.source.product_summary(handle).await {
                Ok(Some(mut product)) => {
                    product.resolve_assets(&self.inner.assets);
                    Some(product)
                }
                Ok(None) => {
                    tracing::debug!(handle, "Product not found on platform");
                    None
                }
                Err(e) => {
                    tracing::warn!(handle, error = %e, "Live product fetch failed, using fallback");
                    None
                }
            }
        };

        self.inner.cache.get_or_load(handle, load).await
    }

    /// Resolve a handle, falling back to `fallback`.
    ///
    /// Handles that are empty or `#` never reach the network.
    #[instrument(skip(self, fallback))]
    pub async fn resolve_handle(&self, handle: &str, fallback: Option<ProductRecord>) -> Resolution {
        if !is_product_handle(handle) {
            return Resolution::from_fallback(fallback);
        }

        match self.fetch_live(handle.trim()).await {
            Some(product) => Resolution::Shopify(product),
            None => Resolution::from_fallback(fallback),
        }
    }

    /// Resolve one hotspot, keeping its position.
    #[instrument(skip_all, fields(handle = hotspot.shopify_handle.as_deref()))]
    pub async fn resolve_hotspot(&self, hotspot: &Hotspot) -> ResolvedHotspot {
        let fallback = hotspot.fallback_product().map(|mut product| {
            if product.handle.is_none() {
                product.handle = hotspot.handle().map(str::to_string);
            }
            product
        });

        let resolution = match hotspot.handle() {
            Some(handle) => self.resolve_handle(handle, fallback).await,
            None => Resolution::from_fallback(fallback),
        };

        ResolvedHotspot {
            id: hotspot.id.clone(),
            position: hotspot.position(),
            shopify_handle: hotspot.shopify_handle.clone(),
            display: resolution.product().map(|p| self.display(p)),
            resolution,
        }
    }

    /// Resolve every hotspot of a scene concurrently.
    ///
    /// Waits for all hotspots; the result preserves hotspot order.
    #[instrument(skip_all, fields(scene = scene.id.as_deref()))]
    pub async fn resolve_scene(&self, scene: &Scene) -> ResolvedScene {
        let hotspots = join_all(scene.hotspots.iter().map(|h| self.resolve_hotspot(h))).await;

        ResolvedScene {
            id: scene.id.clone(),
            title: scene.title.clone(),
            image: scene.image.clone(),
            category: scene.category.clone(),
            hotspots,
        }
    }

    /// Floating products for a scene.
    ///
    /// Uses the curated `inventory` when present, else the resolved hotspot
    /// products, else the scene's `products`. Unnamed entries are skipped.
    #[instrument(skip_all, fields(scene = scene.id.as_deref()))]
    pub async fn scene_showcase(&self, scene: &Scene) -> Vec<DisplayProduct> {
        let products: Vec<ProductRecord> = if scene.inventory.is_empty() {
            if scene.hotspots.is_empty() {
                scene.products.clone()
            } else {
                self.resolve_scene(scene)
                    .await
                    .hotspots
                    .into_iter()
                    .filter_map(|h| h.resolution.into_product())
                    .collect()
            }
        } else {
            scene.inventory.clone()
        };

        products
            .iter()
            .filter(|p| p.has_name())
            .map(|p| self.display(p))
            .collect()
    }

    async fn resolve_references(
        &self,
        references: Vec<(String, Option<ProductRecord>)>,
    ) -> Vec<ProductRecord> {
        let resolutions = join_all(references.into_iter().map(|(handle, fallback)| async move {
            self.resolve_handle(&handle, fallback).await
        }))
        .await;

        resolutions
            .into_iter()
            .filter_map(Resolution::into_product)
            .collect()
    }

    /// Resolve several handles concurrently, dropping those with no product.
    ///
    /// Product page fallbacks from the site data are used per handle.
    #[instrument(skip(self))]
    pub async fn resolve_products(&self, handles: &[&str]) -> Vec<ProductRecord> {
        let references = handles
            .iter()
            .map(|handle| {
                let handle = handle.trim();
                let fallback = self
                    .inner
                    .site
                    .product_details
                    .get(handle)
                    .and_then(ProductReference::fallback_product);
                (handle.to_string(), fallback)
            })
            .collect();
        self.resolve_references(references).await
    }

    /// Full product for the product page.
    ///
    /// Live detail first, then the site data's product page fallback.
    /// Returns [`Resolution::Missing`] when neither exists.
    #[instrument(skip(self))]
    pub async fn product_detail(&self, handle: &str) -> Resolution {
        let handle = handle.trim();
        if is_product_handle(handle) {
            match self.inner.source.product_detail(handle).await {
                Ok(Some(mut product)) => {
                    product.resolve_assets(&self.inner.assets);
                    return Resolution::Shopify(product);
                }
                Ok(None) => tracing::debug!(handle, "Product detail not found on platform"),
                Err(e) => {
                    tracing::warn!(handle, error = %e, "Live product detail fetch failed, using fallback");
                }
            }
        }

        Resolution::from_fallback(
            self.inner
                .site
                .product_details
                .get(handle)
                .and_then(ProductReference::fallback_product),
        )
    }

    /// Featured products other than `handle`, at most
    /// [`RELATED_PRODUCTS_LIMIT`].
    #[instrument(skip(self))]
    pub async fn related_products(&self, handle: &str) -> Vec<DisplayProduct> {
        let references = self
            .inner
            .site
            .featured_products
            .iter()
            .filter_map(|r| {
                let candidate = r.shopify_handle.as_deref()?.trim();
                (is_product_handle(candidate) && candidate != handle)
                    .then(|| (candidate.to_string(), r.fallback_product()))
            })
            .take(RELATED_PRODUCTS_LIMIT)
            .collect();

        self.resolve_references(references)
            .await
            .iter()
            .map(|p| self.display(p))
            .collect()
    }

    /// Scenes with a hotspot referencing `handle`.
    #[must_use]
    pub fn scenes_featuring(&self, handle: &str) -> Vec<SceneSummary> {
        self.inner
            .site
            .scenes_featuring(handle)
            .map(SceneSummary::from)
            .collect()
    }
}
