//! `CozySpot` storefront library.
//!
//! Resolves product data for shoppable scenes from the shop's live APIs, a
//! process-wide cache and bundled site data, and serves it as JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resolver;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use middleware::RequestId;
use state::AppState;

/// Build the application router with tracing, CORS and request IDs.
pub fn app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map_or("", RequestId::as_str);
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    // Last layer runs first: the request ID must exist before the trace span
    routes::routes()
        .with_state(state)
        .layer(trace)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
}
