//! Product resolution end to end against a mock shop.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use cozyspot_core::AssetResolver;
use cozyspot_integration_tests::{liquid_product, public_config, site_data, storefront_product};
use cozyspot_storefront::catalog::SiteData;
use cozyspot_storefront::resolver::{LiveSource, ProductResolver, Resolution};
use cozyspot_storefront::shopify::StorefrontClient;
use cozyspot_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn public_state(shop: &MockServer, site: SiteData) -> AppState {
    AppState::new(public_config(shop), site, &reqwest::Client::new())
}

#[tokio::test]
async fn test_scene_resolution_hits_each_handle_once() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oak-lamp.js"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(liquid_product("oak-lamp", "Oak Lamp", 4900)),
        )
        .expect(1)
        .mount(&shop)
        .await;

    let state = public_state(&shop, site_data());
    let scene = state.site().find_scene("loft").unwrap().clone();

    let first = state.resolver().resolve_scene(&scene).await;
    let second = state.resolver().resolve_scene(&scene).await;

    for resolved in [&first, &second] {
        let live = &resolved.hotspots[0];
        assert_eq!(live.position.top.as_deref(), Some("40%"));
        assert_eq!(live.position.left.as_deref(), Some("22%"));
        let Resolution::Shopify(product) = &live.resolution else {
            panic!("expected live product");
        };
        assert_eq!(product.price.as_deref(), Some("49.00"));

        let bundled = &resolved.hotspots[1];
        assert_eq!(bundled.position.top.as_deref(), Some("70%"));
        assert_eq!(bundled.resolution.kind(), "fallback");
    }
}

#[tokio::test]
async fn test_shared_handle_in_one_scene_is_fetched_once() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oak-lamp.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(liquid_product("oak-lamp", "Oak Lamp", 4900))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&shop)
        .await;

    let site: SiteData = serde_json::from_value(json!({
        "gallery_scenes": [{
            "id": "den",
            "hotspots": [
                {"id": "a", "top": "12%", "left": "30%", "shopify_handle": "oak-lamp"},
                {"id": "b", "top": "64%", "left": "71%", "shopify_handle": "oak-lamp"}
            ]
        }]
    }))
    .unwrap();
    let state = public_state(&shop, site);
    let scene = state.site().find_scene("den").unwrap().clone();

    let resolved = state.resolver().resolve_scene(&scene).await;

    assert_eq!(resolved.hotspots[0].resolution.kind(), "shopify");
    assert_eq!(resolved.hotspots[1].resolution.kind(), "shopify");
    assert_eq!(resolved.hotspots[1].position.top.as_deref(), Some("64%"));
}

#[tokio::test]
async fn test_shop_outage_uses_fallback() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&shop)
        .await;

    let state = public_state(&shop, site_data());
    let scene = state.site().find_scene("Sunny Loft").unwrap().clone();

    let resolved = state.resolver().resolve_scene(&scene).await;
    let product = resolved.hotspots[0].resolution.product().unwrap();
    assert_eq!(product.name(), Some("Oak Lamp (bundled)"));
    assert_eq!(product.handle.as_deref(), Some("oak-lamp"));
    assert!(state.resolver().cache().get("oak-lamp").await.is_none());
}

#[tokio::test]
async fn test_hash_handle_never_reaches_shop() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&shop)
        .await;

    let state = public_state(&shop, site_data());
    let hotspot = state.site().gallery_scenes[0].hotspots[1].clone();

    let resolved = state.resolver().resolve_hotspot(&hotspot).await;
    assert_eq!(resolved.resolution.product().unwrap().name(), Some("Linen Throw"));
}

#[tokio::test]
async fn test_placeholder_token_selects_public_mode() {
    let shop = MockServer::start().await;
    let site: SiteData = serde_json::from_value(json!({
        "shopify_config": {
            "store_domain": "cozy.myshopify.com",
            "storefront_access_token": "YOUR_STOREFRONT_ACCESS_TOKEN"
        }
    }))
    .unwrap();

    let state = public_state(&shop, site);
    assert_eq!(state.resolver().source().mode(), "public");
}

#[tokio::test]
async fn test_real_token_selects_storefront_mode() {
    let shop = MockServer::start().await;
    let site: SiteData = serde_json::from_value(json!({
        "shopify_config": {
            "store_domain": "cozy.myshopify.com",
            "storefront_access_token": "3f9a1c7e5b2d8f4061a9c3e7b5d2f801"
        }
    }))
    .unwrap();

    let state = public_state(&shop, site);
    assert_eq!(state.resolver().source().mode(), "storefront");
    assert!(state.cart().is_some());
}

#[tokio::test]
async fn test_storefront_product_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"product": storefront_product("oak-lamp", "Oak Lamp", "52.5")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StorefrontClient::with_endpoint(
        format!("{}/graphql.json", server.uri()),
        SecretString::from("3f9a1c7e5b2d8f4061a9c3e7b5d2f801"),
        reqwest::Client::new(),
    );
    let resolver = ProductResolver::new(
        LiveSource::Storefront(client),
        Arc::new(site_data()),
        AssetResolver::default(),
    );

    let detail = resolver.product_detail("oak-lamp").await;
    assert_eq!(detail.kind(), "shopify");
    let display = resolver.display(detail.product().unwrap());
    assert_eq!(display.price.as_deref(), Some("52.5"));
    assert_eq!(display.currency_symbol, "€");
    assert_eq!(display.link.as_deref(), Some("/products/oak-lamp"));
}

#[tokio::test]
async fn test_product_page_falls_back_to_site_data() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oak-lamp.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&shop)
        .await;

    let state = public_state(&shop, site_data());
    let detail = state.resolver().product_detail("oak-lamp").await;
    assert_eq!(detail.kind(), "fallback");
    assert!(state.resolver().product_detail("ghost").await.is_missing());
}
