//! AJAX cart client and cart service against a mock shop.

#![allow(clippy::unwrap_used)]

use cozyspot_core::AssetResolver;
use cozyspot_integration_tests::liquid_product;
use cozyspot_storefront::services::{AddToCartInput, CartService};
use cozyspot_storefront::shopify::AjaxCartClient;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIE: &str = "cart=c1-abc; _shopify_y=xyz";

fn cart_client(shop: &MockServer, product_base: &str) -> AjaxCartClient {
    AjaxCartClient::new(&shop.uri(), product_base, reqwest::Client::new())
}

fn service(shop: &MockServer) -> CartService {
    CartService::new(cart_client(shop, "/products"), AssetResolver::default())
}

#[tokio::test]
async fn test_add_line_forwards_cookie() {
    let shop = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(header("cookie", COOKIE))
        .and(body_json(json!({"id": 42, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&shop)
        .await;

    cart_client(&shop, "/products")
        .add_line("42", 2, Some(COOKIE))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cart_drawer_count() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sections", "cart-drawer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart-drawer": "<div id=\"drawer\"><span data-cart-count>3</span></div>"
        })))
        .mount(&shop)
        .await;

    let section = cart_client(&shop, "/products").cart_drawer(None).await.unwrap();
    assert_eq!(section.item_count, Some(3));
    assert!(section.html.unwrap().contains("drawer"));
}

#[tokio::test]
async fn test_add_without_variant_looks_up_product() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oak-lamp.js"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(liquid_product("oak-lamp", "Oak Lamp", 1999)),
        )
        .expect(1)
        .mount(&shop)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({"id": 42, "quantity": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&shop)
        .await;

    let outcome = service(&shop)
        .add_to_cart(
            AddToCartInput {
                handle: Some("oak-lamp".to_string()),
                quantity: Some(0),
                ..AddToCartInput::default()
            },
            Some(COOKIE),
        )
        .await;

    assert!(outcome.ok);
    let item = outcome.item;
    assert_eq!(item.variant_id.as_deref(), Some("42"));
    assert_eq!(item.title, "Oak Lamp");
    assert_eq!(item.price, Decimal::new(1999, 2));
    assert_eq!(item.image, "//cdn.example/oak-lamp.jpg");
    assert_eq!(item.variant_title, None);
    assert_eq!(item.quantity, 1);
}

#[tokio::test]
async fn test_gid_variant_skips_product_lookup() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oak-lamp.js"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&shop)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({"id": 77, "quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&shop)
        .await;

    let outcome = service(&shop)
        .add_to_cart(
            AddToCartInput {
                handle: Some("oak-lamp".to_string()),
                variant_id: Some("gid://shopify/ProductVariant/77".to_string()),
                title: Some("Oak Lamp".to_string()),
                price: Some("49.90".to_string()),
                variant_title: Some("Walnut".to_string()),
                quantity: Some(3),
                ..AddToCartInput::default()
            },
            None,
        )
        .await;

    assert!(outcome.ok);
    assert_eq!(outcome.item.id, "77");
    assert_eq!(outcome.item.price, Decimal::new(4990, 2));
    assert_eq!(outcome.item.variant_title.as_deref(), Some("Walnut"));
}

#[tokio::test]
async fn test_rejected_add_is_not_ok() {
    let shop = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "description": "All 1 Oak Lamp are in your cart."
        })))
        .mount(&shop)
        .await;

    let outcome = service(&shop)
        .add_to_cart(
            AddToCartInput {
                variant_id: Some("42".to_string()),
                ..AddToCartInput::default()
            },
            None,
        )
        .await;

    assert!(!outcome.ok);
    assert_eq!(outcome.item.title, "Unknown Item");
    assert_eq!(outcome.item.price, Decimal::ZERO);
}

#[tokio::test]
async fn test_product_base_is_tried_first() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop/rug.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&shop)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/rug.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(liquid_product("rug", "Rug", 9900)))
        .expect(1)
        .mount(&shop)
        .await;

    let product = cart_client(&shop, "/shop").product_json("rug", None).await.unwrap();
    assert_eq!(product.title.as_deref(), Some("Rug"));
}

#[tokio::test]
async fn test_change_line_refreshes_with_cart_js_fallback() {
    let shop = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"id": "42:abc", "quantity": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&shop)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sections", "cart-drawer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart-drawer": "<div>Your cart is empty</div>"
        })))
        .mount(&shop)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"item_count": 0, "items": []})))
        .expect(1)
        .mount(&shop)
        .await;

    let snapshot = service(&shop).change_line("42:abc", 0, Some(COOKIE)).await.unwrap();
    assert_eq!(snapshot.item_count, Some(0));
    assert!(snapshot.html.unwrap().contains("empty"));
}

#[tokio::test]
async fn test_change_line_rejected() {
    let shop = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&shop)
        .await;

    assert!(service(&shop).change_line("missing", 1, None).await.is_err());
}

#[tokio::test]
async fn test_product_json_handle_stays_in_one_segment() {
    let shop = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"item_count": 3})))
        .expect(0)
        .mount(&shop)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&shop)
        .await;

    let product = cart_client(&shop, "/shop").product_json("../cart", None).await;
    assert!(product.is_none());
}
