//! AJAX cart client.
//!
//! The shop owns the cart; this client forwards the shopper's `Cookie` header
//! so every call lands in their existing cart session.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::public::{PublicProduct, get_product_json};
use super::{ShopifyError, body_excerpt, product_json_url};

/// Section rendered for the cart drawer.
pub const CART_DRAWER_SECTION: &str = "cart-drawer";

#[allow(clippy::expect_used)]
static CART_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data-cart-count[^>]*>\s*(\d+)").expect("valid cart count regex")
});

/// Parse the item count from cart drawer HTML.
///
/// Reads the text content of the element carrying `data-cart-count`.
#[must_use]
pub fn parse_cart_count(html: &str) -> Option<u32> {
    CART_COUNT_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The rendered cart drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSection {
    pub html: Option<String>,
    pub item_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CartSummary {
    item_count: u32,
}

/// Client for the shop's AJAX cart endpoints.
#[derive(Debug, Clone)]
pub struct AjaxCartClient {
    client: reqwest::Client,
    origin: String,
    product_base: String,
}

impl AjaxCartClient {
    /// Create a client for the shop at `origin`.
    ///
    /// `product_base` is the storefront's product path prefix; product JSON
    /// is looked up there first, then under `/products`.
    #[must_use]
    pub fn new(origin: &str, product_base: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
            product_base: product_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    fn with_cookie(
        request: reqwest::RequestBuilder,
        cookie: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        cookie: Option<&str>,
    ) -> Result<(), ShopifyError> {
        let url = self.url(path);
        let request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        let response = Self::with_cookie(request, cookie).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body_excerpt(&text, 300), "Cart request rejected");
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    /// Add a variant to the cart (`POST /cart/add.js`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the shop rejects the add.
    #[instrument(skip(self, cookie))]
    pub async fn add_line(
        &self,
        variant_id: &str,
        quantity: u32,
        cookie: Option<&str>,
    ) -> Result<(), ShopifyError> {
        let id = variant_id
            .parse::<u64>()
            .map_or_else(|_| json!(variant_id), |n| json!(n));
        self.post_json("/cart/add.js", &json!({ "id": id, "quantity": quantity }), cookie)
            .await
    }

    /// Set a line's quantity (`POST /cart/change.js`). Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the shop rejects the change.
    #[instrument(skip(self, cookie))]
    pub async fn change_line(
        &self,
        line_key: &str,
        quantity: u32,
        cookie: Option<&str>,
    ) -> Result<(), ShopifyError> {
        self.post_json(
            "/cart/change.js",
            &json!({ "id": line_key, "quantity": quantity }),
            cookie,
        )
        .await
    }

    /// Render the cart drawer section.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a section map.
    #[instrument(skip(self, cookie))]
    pub async fn cart_drawer(&self, cookie: Option<&str>) -> Result<CartSection, ShopifyError> {
        let url = self.url(&format!("/?sections={CART_DRAWER_SECTION}"));
        let request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        let response = Self::with_cookie(request, cookie).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let mut sections: HashMap<String, Option<String>> = response.json().await?;
        let html = sections.remove(CART_DRAWER_SECTION).flatten();
        let item_count = html.as_deref().and_then(parse_cart_count);
        Ok(CartSection { html, item_count })
    }

    /// Read the cart's item count (`GET /cart.js`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not cart JSON.
    #[instrument(skip(self, cookie))]
    pub async fn item_count(&self, cookie: Option<&str>) -> Result<u32, ShopifyError> {
        let url = self.url("/cart.js");
        let request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        let response = Self::with_cookie(request, cookie).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        let cart: CartSummary = response.json().await?;
        Ok(cart.item_count)
    }

    /// Look up product JSON by handle.
    ///
    /// Tries the storefront's product path first, then `/products`. Failures
    /// are logged and yield `None`.
    #[instrument(skip(self, cookie))]
    pub async fn product_json(&self, handle: &str, cookie: Option<&str>) -> Option<PublicProduct> {
        let mut urls = Vec::with_capacity(2);
        for base in [self.product_base.as_str(), "/products"] {
            match product_json_url(&self.origin, base, handle) {
                Ok(url) if !urls.contains(&url) => urls.push(url),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Cannot build product JSON URL"),
            }
        }

        for url in urls {
            match get_product_json(&self.client, &url, cookie).await {
                Ok(Some(product)) => return Some(product),
                Ok(None) => tracing::debug!(url = %url, "Product JSON not found"),
                Err(e) => tracing::warn!(url = %url, error = %e, "Product JSON lookup failed"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_count() {
        assert_eq!(
            parse_cart_count(r#"<span class="count" data-cart-count>3</span>"#),
            Some(3)
        );
        assert_eq!(
            parse_cart_count("<span data-cart-count=\"\">\n  12\n</span>"),
            Some(12)
        );
        assert_eq!(parse_cart_count("<div>empty</div>"), None);
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let client = AjaxCartClient::new("https://shop.example/", "/shop/", reqwest::Client::new());
        assert_eq!(client.url("/cart.js"), "https://shop.example/cart.js");
        assert_eq!(client.product_base, "/shop");
    }
}
