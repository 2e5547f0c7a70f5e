//! Public product JSON client (`/products/{handle}.js`).
//!
//! Every Shopify theme serves product JSON without authentication. Prices are
//! integer minor units; they are converted to decimal strings here.

use cozyspot_core::types::de::opt_i64_lenient;
use cozyspot_core::{
    ProductOption, ProductRecord, SelectedOption, VariantRecord, format_money_from_cents,
};
use serde::Deserialize;
use tracing::instrument;

use super::{ShopifyError, body_excerpt, product_json_url};

/// Product JSON as served by `/products/{handle}.js`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicProduct {
    pub id: serde_json::Value,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub compare_at_price: Option<i64>,
    #[serde(default)]
    pub featured_image: Option<PublicImage>,
    #[serde(default)]
    pub images: Vec<PublicImage>,
    #[serde(default)]
    pub variants: Vec<PublicVariant>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

/// An image reference: a bare URL or an object with `src`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PublicImage {
    Url(String),
    Object { src: Option<String> },
}

impl PublicImage {
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        let src = match self {
            Self::Url(url) => Some(url.as_str()),
            Self::Object { src } => src.as_deref(),
        };
        src.filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicVariant {
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub compare_at_price: Option<i64>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub featured_image: Option<PublicImage>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl PublicVariant {
    /// The variant ID as a string.
    #[must_use]
    pub fn id_string(&self) -> Option<String> {
        json_id(&self.id)
    }
}

impl PublicProduct {
    /// The variant to sell when none was chosen: first available, else first.
    #[must_use]
    pub fn default_variant(&self) -> Option<&PublicVariant> {
        self.variants
            .iter()
            .find(|v| v.available == Some(true))
            .or_else(|| self.variants.first())
    }

    /// The product's main image URL.
    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.featured_image
            .as_ref()
            .and_then(PublicImage::src)
            .or_else(|| self.images.iter().find_map(PublicImage::src))
    }

    /// Convert into a record, tagging prices with `currency`.
    #[must_use]
    pub fn into_record(self, currency: &str) -> ProductRecord {
        let first = self.variants.first();
        let price = first.and_then(|v| v.price).or(self.price);
        let compare_at = first.and_then(|v| v.compare_at_price).or(self.compare_at_price);
        let image = self.main_image().map(str::to_string);
        let sku = first.and_then(|v| v.sku.clone()).filter(|s| !s.is_empty());
        let option_names: Vec<String> = self.options.iter().map(|o| o.name.clone()).collect();

        ProductRecord {
            id: json_id(&self.id),
            handle: self.handle,
            title: self.title,
            description_html: self.description.clone(),
            description: self.description,
            image,
            images: self
                .images
                .iter()
                .filter_map(PublicImage::src)
                .map(str::to_string)
                .collect(),
            price: format_money_from_cents(price),
            compare_at_price: format_money_from_cents(compare_at),
            currency: Some(currency.to_string()),
            available: self.available,
            sku,
            variants: self
                .variants
                .into_iter()
                .map(|v| convert_variant(v, &option_names))
                .collect(),
            options: self.options,
            vendor: self.vendor,
            product_type: self.product_type.filter(|t| !t.is_empty()),
            tags: self.tags,
            ..ProductRecord::default()
        }
    }
}

fn convert_variant(variant: PublicVariant, option_names: &[String]) -> VariantRecord {
    VariantRecord {
        id: variant.id_string(),
        title: variant.title,
        sku: variant.sku.filter(|s| !s.is_empty()),
        price: format_money_from_cents(variant.price),
        available: variant.available,
        image: variant
            .featured_image
            .as_ref()
            .and_then(PublicImage::src)
            .map(str::to_string),
        options: variant
            .options
            .into_iter()
            .enumerate()
            .map(|(i, value)| SelectedOption {
                name: option_names.get(i).cloned(),
                value,
            })
            .collect(),
    }
}

fn json_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// GET a product JSON document.
///
/// Returns `Ok(None)` on 404.
pub(crate) async fn get_product_json(
    client: &reqwest::Client,
    url: &str,
    cookie: Option<&str>,
) -> Result<Option<PublicProduct>, ShopifyError> {
    let mut request = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(cookie) = cookie {
        request = request.header(reqwest::header::COOKIE, cookie);
    }

    let response = request.send().await?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ShopifyError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map(Some).map_err(|e| {
        tracing::debug!(error = %e, body = %body_excerpt(&text, 300), "Invalid product JSON");
        ShopifyError::Parse(e)
    })
}

/// Client for the shop's unauthenticated product JSON.
#[derive(Debug, Clone)]
pub struct PublicProductClient {
    client: reqwest::Client,
    origin: String,
    currency: String,
}

impl PublicProductClient {
    /// Create a client for the shop at `origin` (e.g. `https://shop.example`).
    #[must_use]
    pub fn new(origin: &str, currency: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
            currency: currency.into(),
        }
    }

    /// The product JSON URL for a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is not a valid base URL.
    pub fn product_url(&self, handle: &str) -> Result<String, ShopifyError> {
        product_json_url(&self.origin, "/products", handle)
    }

    /// Fetch a product by handle.
    ///
    /// Returns `Ok(None)` if the shop has no such product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the shop answers with a
    /// non-success status, or the body is not product JSON.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Option<ProductRecord>, ShopifyError> {
        let url = self.product_url(handle)?;
        let product = get_product_json(&self.client, &url, None).await?;
        Ok(product.map(|p| p.into_record(&self.currency)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn liquid_product() -> PublicProduct {
        serde_json::from_value(json!({
            "id": 7001,
            "handle": "wool-throw",
            "title": "Wool Throw",
            "description": "<p>Warm</p>",
            "vendor": "Cozy",
            "type": "Textiles",
            "tags": ["winter"],
            "available": true,
            "price": 4500,
            "featured_image": "//cdn.example/throw.jpg",
            "images": ["//cdn.example/throw.jpg", "//cdn.example/throw-2.jpg"],
            "options": [{"name": "Color", "position": 1, "values": ["Grey", "Sand"]}],
            "variants": [
                {"id": 11, "title": "Grey", "price": 3990, "compare_at_price": 4990,
                 "available": false, "sku": "WT-G", "options": ["Grey"]},
                {"id": 12, "title": "Sand", "price": "4190", "available": true,
                 "featured_image": {"src": "//cdn.example/sand.jpg"}, "options": ["Sand"]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_into_record() {
        let record = liquid_product().into_record("EUR");
        assert_eq!(record.id.as_deref(), Some("7001"));
        assert_eq!(record.price.as_deref(), Some("39.90"));
        assert_eq!(record.compare_at_price.as_deref(), Some("49.90"));
        assert_eq!(record.currency.as_deref(), Some("EUR"));
        assert_eq!(record.image.as_deref(), Some("//cdn.example/throw.jpg"));
        assert_eq!(record.images.len(), 2);
        assert_eq!(record.description_html.as_deref(), Some("<p>Warm</p>"));
        assert_eq!(record.product_type.as_deref(), Some("Textiles"));
        assert_eq!(record.sku.as_deref(), Some("WT-G"));

        let sand = &record.variants[1];
        assert_eq!(sand.id.as_deref(), Some("12"));
        assert_eq!(sand.price.as_deref(), Some("41.90"));
        assert_eq!(sand.image.as_deref(), Some("//cdn.example/sand.jpg"));
        assert_eq!(sand.options[0].name.as_deref(), Some("Color"));
        assert_eq!(sand.options[0].value, "Sand");
    }

    #[test]
    fn test_default_variant_prefers_available() {
        let product = liquid_product();
        assert_eq!(product.default_variant().unwrap().id_string().as_deref(), Some("12"));
    }

    #[test]
    fn test_default_variant_falls_back_to_first() {
        let product: PublicProduct = serde_json::from_value(json!({
            "id": 1,
            "variants": [{"id": 5, "available": false}, {"id": 6, "available": false}]
        }))
        .unwrap();
        assert_eq!(product.default_variant().unwrap().id_string().as_deref(), Some("5"));
    }

    #[test]
    fn test_product_price_used_without_variants() {
        let product: PublicProduct =
            serde_json::from_value(json!({"id": 2, "title": "Mug", "price": 1250})).unwrap();
        let record = product.into_record("USD");
        assert_eq!(record.price.as_deref(), Some("12.50"));
        assert_eq!(record.image, None);
    }

    #[test]
    fn test_product_url() {
        let client = PublicProductClient::new("https://shop.example/", "USD", reqwest::Client::new());
        assert_eq!(
            client.product_url("oak-lamp").unwrap(),
            "https://shop.example/products/oak-lamp.js"
        );
    }

    #[test]
    fn test_product_url_keeps_handle_in_one_segment() {
        let client = PublicProductClient::new("https://shop.example", "USD", reqwest::Client::new());
        assert_eq!(
            client.product_url("../cart").unwrap(),
            "https://shop.example/products/..%2Fcart.js"
        );
        assert_eq!(
            client.product_url("lamp?view=x").unwrap(),
            "https://shop.example/products/lamp%3Fview=x.js"
        );
    }
}
