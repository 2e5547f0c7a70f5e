//! Cart operations.
//!
//! The shop keeps the cart. This service fills in whatever the caller did not
//! send (variant, title, price, image) from the shop's product JSON, posts the
//! add, and reports the resulting drawer contents.

use cozyspot_core::types::de::{opt_i64_lenient, opt_string_or_number};
use cozyspot_core::{AssetResolver, format_money_from_cents, normalize_variant_id, parse_price_value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::shopify::{AjaxCartClient, CartSection, PublicImage, PublicProduct, ShopifyError};

const UNKNOWN_ITEM_TITLE: &str = "Unknown Item";
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Add-to-cart request as sent by a product card or product page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddToCartInput {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, alias = "variantId", deserialize_with = "opt_string_or_number")]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub price: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "variantTitle")]
    pub variant_title: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub quantity: Option<i64>,
}

/// The cart line as resolved locally, returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalCartItem {
    pub id: String,
    pub handle: Option<String>,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    pub variant_id: Option<String>,
    pub variant_title: Option<String>,
    pub quantity: u32,
}

/// Result of an add: whether the shop accepted it, and the local line.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartOutcome {
    pub ok: bool,
    pub item: LocalCartItem,
}

/// Cart drawer HTML and item count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub html: Option<String>,
    pub item_count: Option<u32>,
}

impl From<CartSection> for CartSnapshot {
    fn from(section: CartSection) -> Self {
        Self {
            html: section.html,
            item_count: section.item_count,
        }
    }
}

/// Clamp a requested quantity to at least one.
fn line_quantity(requested: Option<i64>) -> u32 {
    requested
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0)
        .unwrap_or(1)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Cart operations against the shop's AJAX cart.
#[derive(Debug, Clone)]
pub struct CartService {
    client: AjaxCartClient,
    assets: AssetResolver,
}

impl CartService {
    #[must_use]
    pub const fn new(client: AjaxCartClient, assets: AssetResolver) -> Self {
        Self { client, assets }
    }

    /// Add an item to the cart.
    ///
    /// Without a variant ID, the product JSON is fetched by handle and the
    /// first available variant (else the first variant) is used. `ok` is
    /// `true` only if the shop accepted the add.
    #[instrument(skip(self, input, cookie), fields(handle = input.handle.as_deref()))]
    pub async fn add_to_cart(&self, input: AddToCartInput, cookie: Option<&str>) -> AddToCartOutcome {
        let quantity = line_quantity(input.quantity);
        let handle = non_empty(input.handle.as_deref()).map(str::to_string);
        let mut variant_id = non_empty(input.variant_id.as_deref()).and_then(normalize_variant_id);

        let product: Option<PublicProduct> = match (&variant_id, &handle) {
            (None, Some(handle)) => self.client.product_json(handle, cookie).await,
            _ => None,
        };
        let selected = product.as_ref().and_then(PublicProduct::default_variant);

        if variant_id.is_none() {
            variant_id = selected.and_then(|v| v.id_string());
        }

        let title = non_empty(input.title.as_deref())
            .or_else(|| product.as_ref().and_then(|p| non_empty(p.title.as_deref())))
            .or(handle.as_deref())
            .unwrap_or(UNKNOWN_ITEM_TITLE)
            .to_string();

        let price = non_empty(input.price.as_deref())
            .map(str::to_string)
            .or_else(|| format_money_from_cents(selected.and_then(|v| v.price)))
            .or_else(|| format_money_from_cents(product.as_ref().and_then(|p| p.price)))
            .and_then(|p| parse_price_value(&p))
            .unwrap_or_default();

        let image = non_empty(input.image.as_deref())
            .or_else(|| {
                selected
                    .and_then(|v| v.featured_image.as_ref())
                    .and_then(PublicImage::src)
            })
            .or_else(|| product.as_ref().and_then(PublicProduct::main_image));

        let variant_title = non_empty(input.variant_title.as_deref())
            .or_else(|| selected.and_then(|v| non_empty(v.title.as_deref())))
            .filter(|t| !t.eq_ignore_ascii_case(DEFAULT_VARIANT_TITLE))
            .map(str::to_string);

        let ok = match variant_id.as_deref() {
            Some(id) => match self.client.add_line(id, quantity, cookie).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(variant_id = id, error = %e, "Add to cart failed");
                    false
                }
            },
            None => {
                tracing::warn!("Add to cart without a resolvable variant");
                false
            }
        };

        let item = LocalCartItem {
            id: variant_id
                .clone()
                .or_else(|| handle.clone())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            handle,
            title,
            price,
            image: self.assets.resolve_image(image),
            variant_id,
            variant_title,
            quantity,
        };

        AddToCartOutcome { ok, item }
    }

    /// Set a line's quantity, then refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop rejects the change.
    #[instrument(skip(self, cookie))]
    pub async fn change_line(
        &self,
        line_key: &str,
        quantity: u32,
        cookie: Option<&str>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.client.change_line(line_key, quantity, cookie).await?;
        Ok(self.refresh(cookie).await)
    }

    /// Current drawer HTML and item count.
    ///
    /// Falls back to `/cart.js` for the count when the section does not
    /// carry one. Failures are logged and leave fields empty.
    #[instrument(skip(self, cookie))]
    pub async fn refresh(&self, cookie: Option<&str>) -> CartSnapshot {
        let mut snapshot: CartSnapshot = match self.client.cart_drawer(cookie).await {
            Ok(section) => section.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Cart drawer refresh failed");
                CartSnapshot::default()
            }
        };

        if snapshot.item_count.is_none() {
            match self.client.item_count(cookie).await {
                Ok(count) => snapshot.item_count = Some(count),
                Err(e) => tracing::warn!(error = %e, "Cart count lookup failed"),
            }
        }

        snapshot
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_line_quantity() {
        assert_eq!(line_quantity(None), 1);
        assert_eq!(line_quantity(Some(0)), 1);
        assert_eq!(line_quantity(Some(-3)), 1);
        assert_eq!(line_quantity(Some(4)), 4);
    }

    #[test]
    fn test_input_accepts_loose_json() {
        let input: AddToCartInput = serde_json::from_value(json!({
            "handle": "oak-lamp",
            "variantId": 42,
            "price": 19.9,
            "quantity": "2"
        }))
        .unwrap();
        assert_eq!(input.variant_id.as_deref(), Some("42"));
        assert_eq!(input.price.as_deref(), Some("19.9"));
        assert_eq!(input.quantity, Some(2));
    }

    #[test]
    fn test_snapshot_from_section() {
        let snapshot = CartSnapshot::from(CartSection {
            html: Some("<div></div>".to_string()),
            item_count: Some(2),
        });
        assert_eq!(snapshot.item_count, Some(2));
    }
}
