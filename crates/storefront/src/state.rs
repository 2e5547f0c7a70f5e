//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::SiteData;
use crate::config::StorefrontConfig;
use crate::resolver::{LiveSource, ProductResolver};
use crate::services::CartService;
use crate::shopify::{AjaxCartClient, PublicProductClient, StorefrontClient};

/// Build the shared HTTP client for upstream calls.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client(config: &StorefrontConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.shopify.timeout)
        .user_agent(concat!("cozyspot-storefront/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    resolver: ProductResolver,
    cart: Option<CartService>,
}

impl AppState {
    /// Wire clients, resolver and cart service from configuration and site
    /// data.
    ///
    /// A valid storefront token selects the Storefront API; otherwise the
    /// shop's public product JSON is used. Without any shop, only bundled
    /// data is served and the cart is unavailable.
    #[must_use]
    pub fn new(config: StorefrontConfig, mut site: SiteData, http: &reqwest::Client) -> Self {
        let access = config.shopify.resolve(site.shopify_config.as_ref());

        let source = match (&access.storefront, &access.shop_origin) {
            (Some(credentials), _) => {
                LiveSource::Storefront(StorefrontClient::new(credentials, http.clone()))
            }
            (None, Some(origin)) => LiveSource::Public(PublicProductClient::new(
                origin,
                config.default_currency.clone(),
                http.clone(),
            )),
            (None, None) => LiveSource::Offline,
        };
        tracing::info!(mode = source.mode(), "Product source selected");

        let cart = access.shop_origin.as_deref().map(|origin| {
            CartService::new(
                AjaxCartClient::new(origin, &config.assets.product_base, http.clone()),
                config.assets.clone(),
            )
        });

        site.resolve_assets(&config.assets);
        let resolver = ProductResolver::new(source, Arc::new(site), config.assets.clone());

        Self::from_parts(config, resolver, cart)
    }

    /// Assemble state from prebuilt parts.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        resolver: ProductResolver,
        cart: Option<CartService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                resolver,
                cart,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn resolver(&self) -> &ProductResolver {
        &self.inner.resolver
    }

    #[must_use]
    pub fn site(&self) -> &SiteData {
        self.inner.resolver.site()
    }

    /// The cart service, if a shop is configured.
    #[must_use]
    pub fn cart(&self) -> Option<&CartService> {
        self.inner.cart.as_ref()
    }
}
