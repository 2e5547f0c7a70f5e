//! Live product sources.

use std::future::Future;

use cozyspot_core::ProductRecord;

use crate::shopify::{PublicProductClient, ShopifyError, StorefrontClient};

/// A live source of product data.
///
/// `Ok(None)` means the source answered and has no such product.
pub trait ProductSource: Send + Sync {
    /// Product summary for hotspots and cards.
    fn product_summary(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<ProductRecord>, ShopifyError>> + Send;

    /// Full product for the product page.
    fn product_detail(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<ProductRecord>, ShopifyError>> + Send;
}

/// The platform source chosen at startup.
#[derive(Debug, Clone)]
pub enum LiveSource {
    /// Storefront GraphQL (a valid token is configured).
    Storefront(StorefrontClient),
    /// Public product JSON (no usable token).
    Public(PublicProductClient),
    /// No shop configured; only bundled data is served.
    Offline,
}

impl LiveSource {
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Storefront(_) => "storefront",
            Self::Public(_) => "public",
            Self::Offline => "offline",
        }
    }
}

impl ProductSource for LiveSource {
    async fn product_summary(&self, handle: &str) -> Result<Option<ProductRecord>, ShopifyError> {
        match self {
            Self::Storefront(client) => client.get_product_summary(handle).await,
            Self::Public(client) => client.get_product(handle).await,
            Self::Offline => Ok(None),
        }
    }

    async fn product_detail(&self, handle: &str) -> Result<Option<ProductRecord>, ShopifyError> {
        match self {
            Self::Storefront(client) => client.get_product_detail(handle).await,
            Self::Public(client) => client.get_product(handle).await,
            Self::Offline => Ok(None),
        }
    }
}
