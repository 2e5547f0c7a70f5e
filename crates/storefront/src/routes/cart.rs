//! Cart route handlers.
//!
//! Each handler forwards the shopper's cookie so the shop resolves their cart.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use tracing::instrument;

use super::cookie_header;
use crate::error::{AppError, Result};
use crate::services::{AddToCartInput, AddToCartOutcome, CartService, CartSnapshot};
use crate::state::AppState;

/// Change-line request body.
#[derive(Debug, Deserialize)]
pub struct ChangeLineInput {
    /// Line item key (or variant ID).
    #[serde(alias = "id", alias = "key")]
    pub line: String,
    pub quantity: u32,
}

fn cart_service(state: &AppState) -> Result<&CartService> {
    state
        .cart()
        .ok_or_else(|| AppError::Unavailable("Cart is not configured".to_string()))
}

/// Drawer HTML and item count.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<CartSnapshot>> {
    let cart = cart_service(&state)?;
    Ok(Json(cart.refresh(cookie_header(&headers)).await))
}

/// Add to cart.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AddToCartInput>,
) -> Result<Json<AddToCartOutcome>> {
    let cart = cart_service(&state)?;
    Ok(Json(cart.add_to_cart(input, cookie_header(&headers)).await))
}

/// Change a line's quantity.
#[instrument(skip_all)]
pub async fn change(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ChangeLineInput>,
) -> Result<Json<CartSnapshot>> {
    let line = input.line.trim();
    if line.is_empty() {
        return Err(AppError::BadRequest("line is required".to_string()));
    }

    let cart = cart_service(&state)?;
    let snapshot = cart
        .change_line(line, input.quantity, cookie_header(&headers))
        .await?;
    Ok(Json(snapshot))
}
