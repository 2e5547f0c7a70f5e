//! Normalized product records.
//!
//! Every product source (Storefront GraphQL, the public product JSON, bundled
//! fallback fields) is converted into a [`ProductRecord`]. Fallback JSON is
//! hand-written, so deserialization accepts the field spellings that have
//! accumulated in site data files over time.

use serde::{Deserialize, Serialize};

use super::asset::AssetResolver;
use super::de::{opt_string_or_number, vec_or_empty};

/// A product normalized from any source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawProductRecord")]
pub struct ProductRecord {
    pub id: Option<String>,
    pub handle: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub image: Option<String>,
    pub images: Vec<String>,
    /// Decimal price string (e.g. `19.99`), or `N/A` in some fallback data.
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    /// ISO 4217 code or a literal symbol, as the source reported it.
    pub currency: Option<String>,
    pub available: Option<bool>,
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub variants: Vec<VariantRecord>,
    pub options: Vec<ProductOption>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
    pub link: Option<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub price: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "selected_options")]
    pub options: Vec<SelectedOption>,
}

/// A variant's value for one product option (e.g. `Color: Oak`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: Option<String>,
    pub value: String,
}

/// A product option and its possible values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub values: Vec<String>,
}

impl ProductRecord {
    /// The display title, if any non-empty one exists.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns `true` if the record carries a usable name.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.name().is_some()
    }

    /// Shallow-merge `top` over `self`: every field present in `top` wins.
    #[must_use]
    pub fn overlay(self, top: Self) -> Self {
        fn pick<T>(base: Vec<T>, top: Vec<T>) -> Vec<T> {
            if top.is_empty() { base } else { top }
        }

        Self {
            id: top.id.or(self.id),
            handle: top.handle.or(self.handle),
            title: top.title.or(self.title),
            description: top.description.or(self.description),
            description_html: top.description_html.or(self.description_html),
            image: top.image.or(self.image),
            images: pick(self.images, top.images),
            price: top.price.or(self.price),
            compare_at_price: top.compare_at_price.or(self.compare_at_price),
            currency: top.currency.or(self.currency),
            available: top.available.or(self.available),
            quantity_available: top.quantity_available.or(self.quantity_available),
            sku: top.sku.or(self.sku),
            variants: pick(self.variants, top.variants),
            options: pick(self.options, top.options),
            vendor: top.vendor.or(self.vendor),
            product_type: top.product_type.or(self.product_type),
            tags: pick(self.tags, top.tags),
            rating: top.rating.or(self.rating),
            reviews_count: top.reviews_count.or(self.reviews_count),
            link: top.link.or(self.link),
        }
    }

    /// Rewrite image references through the asset resolver.
    pub fn resolve_assets(&mut self, assets: &AssetResolver) {
        if let Some(image) = self.image.take() {
            self.image = assets.resolve_opt_image(Some(&image));
        }
        for image in &mut self.images {
            *image = assets.resolve_image(Some(image));
        }
        for variant in &mut self.variants {
            if let Some(image) = variant.image.take() {
                variant.image = assets.resolve_opt_image(Some(&image));
            }
        }
    }
}

// =============================================================================
// Lenient deserialization
// =============================================================================

#[derive(Deserialize)]
struct RawProductRecord {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    description_html: Option<String>,
    #[serde(default)]
    full_description: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    price: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    compare_at_price: Option<String>,
    #[serde(default, rename = "compareAtPrice", deserialize_with = "opt_string_or_number")]
    compare_at_price_camel: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    old_price: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    quantity_available: Option<i64>,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    variants: Vec<VariantRecord>,
    #[serde(default, deserialize_with = "product_options")]
    options: Vec<ProductOption>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default, rename = "productType")]
    product_type_camel: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    rating: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    reviews_rating: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    reviews_count: Option<String>,
    #[serde(default, rename = "reviewsCount", deserialize_with = "opt_string_or_number")]
    reviews_count_camel: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawProductRecord> for ProductRecord {
    fn from(raw: RawProductRecord) -> Self {
        Self {
            id: raw.id,
            handle: raw.handle,
            title: non_empty(raw.product_name)
                .or_else(|| non_empty(raw.name))
                .or_else(|| non_empty(raw.title)),
            description: raw.description,
            description_html: raw.description_html.or(raw.full_description),
            image: non_empty(raw.img).or_else(|| non_empty(raw.image)),
            images: raw.images,
            price: raw.price,
            compare_at_price: raw
                .compare_at_price
                .or(raw.compare_at_price_camel)
                .or(raw.old_price),
            currency: raw.currency,
            available: raw.available,
            quantity_available: raw.quantity_available,
            sku: raw.sku,
            variants: raw.variants,
            options: raw.options,
            vendor: raw.vendor,
            product_type: raw
                .product_type
                .or(raw.product_type_camel)
                .or(raw.category),
            tags: raw.tags,
            rating: raw.rating.or(raw.reviews_rating),
            reviews_count: raw.reviews_count.or(raw.reviews_count_camel),
            link: raw.link.or(raw.url),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelectedOption {
    Named { name: Option<String>, value: String },
    Plain(String),
}

fn selected_options<'de, D>(deserializer: D) -> Result<Vec<SelectedOption>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<RawSelectedOption> = vec_or_empty(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|opt| match opt {
            RawSelectedOption::Named { name, value } => SelectedOption { name, value },
            RawSelectedOption::Plain(value) => SelectedOption { name: None, value },
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductOption {
    Full {
        name: String,
        #[serde(default, deserialize_with = "vec_or_empty")]
        values: Vec<String>,
    },
    Plain(String),
}

fn product_options<'de, D>(deserializer: D) -> Result<Vec<ProductOption>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<RawProductOption> = vec_or_empty(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|opt| match opt {
            RawProductOption::Full { name, values } => ProductOption { name, values },
            RawProductOption::Plain(name) => ProductOption {
                name,
                values: Vec::new(),
            },
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fallback_spellings() {
        let record: ProductRecord = serde_json::from_value(json!({
            "name": "Oak Desk Lamp",
            "img": "lamp.jpg",
            "price": 49.9,
            "old_price": "59.90",
            "currency": "EUR",
            "category": "Lighting",
            "reviews_rating": 4.8,
            "reviewsCount": 112
        }))
        .unwrap();

        assert_eq!(record.name(), Some("Oak Desk Lamp"));
        assert_eq!(record.image.as_deref(), Some("lamp.jpg"));
        assert_eq!(record.price.as_deref(), Some("49.9"));
        assert_eq!(record.compare_at_price.as_deref(), Some("59.90"));
        assert_eq!(record.product_type.as_deref(), Some("Lighting"));
        assert_eq!(record.rating.as_deref(), Some("4.8"));
        assert_eq!(record.reviews_count.as_deref(), Some("112"));
    }

    #[test]
    fn test_product_name_wins_over_title() {
        let record: ProductRecord = serde_json::from_value(json!({
            "product_name": "Shown Name",
            "title": "Platform Title"
        }))
        .unwrap();
        assert_eq!(record.name(), Some("Shown Name"));
    }

    #[test]
    fn test_options_accept_both_shapes() {
        let record: ProductRecord = serde_json::from_value(json!({
            "title": "Rug",
            "options": ["Size", {"name": "Color", "values": ["Sand", "Ash"]}],
            "variants": [
                {"id": 1, "title": "S / Sand", "options": ["S", "Sand"]},
                {"id": "2", "title": "M / Ash", "options": [{"name": "Size", "value": "M"}]}
            ]
        }))
        .unwrap();

        assert_eq!(record.options.len(), 2);
        assert_eq!(record.options[1].values, vec!["Sand", "Ash"]);
        assert_eq!(record.variants[0].id.as_deref(), Some("1"));
        assert_eq!(record.variants[0].options[1].value, "Sand");
        assert_eq!(record.variants[1].options[0].name.as_deref(), Some("Size"));
    }

    #[test]
    fn test_null_lists_are_empty() {
        let record: ProductRecord = serde_json::from_value(json!({
            "title": "Lamp",
            "images": null,
            "variants": [{"title": "Oak"}, "broken"],
            "options": {"name": "Size"},
            "tags": "cozy"
        }))
        .unwrap();

        assert_eq!(record.name(), Some("Lamp"));
        assert!(record.images.is_empty());
        assert_eq!(record.variants.len(), 1);
        assert!(record.options.is_empty());
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_overlay_prefers_top_fields() {
        let base = ProductRecord {
            title: Some("Embedded".to_string()),
            price: Some("10.00".to_string()),
            tags: vec!["a".to_string()],
            ..ProductRecord::default()
        };
        let top = ProductRecord {
            title: Some("Fallback".to_string()),
            ..ProductRecord::default()
        };

        let merged = base.overlay(top);
        assert_eq!(merged.name(), Some("Fallback"));
        assert_eq!(merged.price.as_deref(), Some("10.00"));
        assert_eq!(merged.tags, vec!["a"]);
    }

    #[test]
    fn test_resolve_assets() {
        let assets = AssetResolver {
            asset_base: "/assets/".to_string(),
            ..AssetResolver::default()
        };
        let mut record = ProductRecord {
            image: Some("lamp.jpg".to_string()),
            images: vec!["a.jpg".to_string(), "https://x.test/b.jpg".to_string()],
            ..ProductRecord::default()
        };
        record.resolve_assets(&assets);
        assert_eq!(record.image.as_deref(), Some("/assets/lamp.jpg"));
        assert_eq!(record.images, vec!["/assets/a.jpg", "https://x.test/b.jpg"]);
    }
}
