//! Integration tests for `CozySpot`.
//!
//! Shopify is replaced by a `wiremock` server; every test starts its own.
//!
//! # Test Categories
//!
//! - `public_products` - Public product JSON client
//! - `storefront_graphql` - Storefront API client
//! - `cart` - AJAX cart client and cart service
//! - `resolution` - Resolver and HTTP API against a mock shop

use cozyspot_storefront::catalog::SiteData;
use cozyspot_storefront::config::StorefrontConfig;
use serde_json::{Value, json};
use wiremock::MockServer;

/// A `/products/{handle}.js` body with one available variant.
#[must_use]
pub fn liquid_product(handle: &str, title: &str, price_cents: i64) -> Value {
    json!({
        "id": 7001,
        "handle": handle,
        "title": title,
        "description": "<p>Made by hand</p>",
        "vendor": "CozySpot",
        "type": "Decor",
        "tags": ["cozy"],
        "available": true,
        "price": price_cents,
        "featured_image": format!("//cdn.example/{handle}.jpg"),
        "images": [format!("//cdn.example/{handle}.jpg")],
        "options": [{"name": "Title", "position": 1, "values": ["Default Title"]}],
        "variants": [{
            "id": 42,
            "title": "Default Title",
            "price": price_cents,
            "available": true,
            "sku": format!("{handle}-1"),
            "options": ["Default Title"]
        }]
    })
}

/// A Storefront API `product` node.
#[must_use]
pub fn storefront_product(handle: &str, title: &str, amount: &str) -> Value {
    json!({
        "id": "gid://shopify/Product/9001",
        "handle": handle,
        "title": title,
        "description": "Soft and warm",
        "images": {"edges": [{"node": {"url": format!("https://cdn.example/{handle}.jpg"), "altText": null}}]},
        "variants": {"edges": [{"node": {
            "id": "gid://shopify/ProductVariant/91",
            "title": "Default Title",
            "availableForSale": true,
            "price": {"amount": amount, "currencyCode": "EUR"},
            "compareAtPrice": null
        }}]}
    })
}

/// Site data with one scene: a live hotspot and a `#` hotspot.
#[must_use]
pub fn site_data() -> SiteData {
    serde_json::from_value(json!({
        "gallery_scenes": [{
            "id": "loft",
            "title": "Sunny Loft",
            "hotspots": [
                {"id": "h1", "top": "40%", "left": "22%", "shopify_handle": "oak-lamp",
                 "fallback": {"title": "Oak Lamp (bundled)", "price": "45.00"}},
                {"id": "h2", "top": "70%", "left": "55%", "shopify_handle": "#",
                 "fallback": {"title": "Linen Throw", "price": "39.00"}}
            ]
        }],
        "product_details": {
            "oak-lamp": {"shopify_handle": "oak-lamp", "fallback": {"title": "Oak Lamp (bundled)"}}
        }
    }))
    .unwrap_or_default()
}

/// Configuration pointing the public endpoints at a mock shop.
#[must_use]
pub fn public_config(shop: &MockServer) -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.shopify.shop_origin = Some(shop.uri());
    config
}
