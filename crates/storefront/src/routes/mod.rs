//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//!
//! # Scenes
//! GET  /api/scenes                      - Scene summaries
//! GET  /api/scenes/{key}                - Scene with resolved hotspots
//! GET  /api/scenes/{key}/showcase       - Floating products
//! GET  /api/hotspots/{scene}/{index}    - One resolved hotspot
//!
//! # Products
//! GET  /api/products/{handle}           - Product page data
//! GET  /api/products/{handle}/display   - Display model
//! GET  /api/products/{handle}/related   - Related products
//! GET  /api/products/{handle}/scenes    - Scenes featuring the product
//!
//! # Cart (proxied to the shop's AJAX cart)
//! GET  /api/cart                        - Drawer HTML and item count
//! POST /api/cart/add                    - Add to cart
//! POST /api/cart/change                 - Change line quantity
//! ```

pub mod cart;
pub mod products;
pub mod scenes;

use axum::{
    Router,
    http::{HeaderMap, header::COOKIE},
    routing::{get, post},
};

use crate::state::AppState;

/// Create the scene routes router.
pub fn scene_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(scenes::index))
        .route("/{key}", get(scenes::show))
        .route("/{key}/showcase", get(scenes::showcase))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(products::show))
        .route("/{handle}/display", get(products::display))
        .route("/{handle}/related", get(products::related))
        .route("/{handle}/scenes", get(products::scenes))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/change", post(cart::change))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/scenes", scene_routes())
        .route("/hotspots/{scene}/{index}", get(scenes::hotspot))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes());

    Router::new().route("/health", get(health)).nest("/api", api)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The shopper's `Cookie` header, forwarded to the shop.
fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
