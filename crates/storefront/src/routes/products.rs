//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use cozyspot_core::{DisplayProduct, ProductRecord};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{ProductReference, SceneSummary};
use crate::error::{AppError, Result};
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Product page payload.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    /// `shopify` or `fallback`.
    pub kind: &'static str,
    pub product: ProductRecord,
    pub display: DisplayProduct,
}

/// Product page data: live detail, else the bundled product page fallback.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<ProductPage>> {
    let handle = handle.trim();
    let resolution = state.resolver().product_detail(handle).await;
    let kind = resolution.kind();
    let product = resolution
        .into_product()
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    Ok(Json(ProductPage {
        kind,
        display: state.resolver().display(&product),
        product,
    }))
}

/// Display model through the resolution merge.
#[instrument(skip(state))]
pub async fn display(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<DisplayProduct>> {
    let handle = handle.trim();
    let fallback = state
        .site()
        .product_details
        .get(handle)
        .and_then(ProductReference::fallback_product);

    let resolution = state.resolver().resolve_handle(handle, fallback).await;
    let product = resolution
        .product()
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;
    Ok(Json(state.resolver().display(product)))
}

/// Related products.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Json<Vec<DisplayProduct>> {
    Json(state.resolver().related_products(handle.trim()).await)
}

/// Scenes featuring the product.
pub async fn scenes(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Json<Vec<SceneSummary>> {
    Json(state.resolver().scenes_featuring(handle.trim()))
}
