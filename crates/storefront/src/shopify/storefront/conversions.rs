//! Storefront API response to [`ProductRecord`] conversions.

use cozyspot_core::{ProductOption, ProductRecord, SelectedOption, VariantRecord};

use super::queries::{GqlImage, GqlProduct, GqlVariant};

/// Currency reported when a product has no priced variant.
const DEFAULT_CURRENCY: &str = "USD";

/// Convert a Storefront product into a record.
///
/// Price, compare-at price, currency, availability, SKU and stock come from
/// the first variant.
pub fn convert_product(product: GqlProduct) -> ProductRecord {
    let images: Vec<String> = product.images.into_nodes().map(|i| i.url).collect();
    let variants: Vec<GqlVariant> = product.variants.into_nodes().collect();
    let first = variants.first();

    ProductRecord {
        id: Some(product.id),
        handle: Some(product.handle),
        title: Some(product.title),
        description: product.description,
        description_html: product.description_html,
        image: images.first().cloned(),
        price: first.and_then(|v| v.price.as_ref()).map(|m| m.amount.clone()),
        compare_at_price: first
            .and_then(|v| v.compare_at_price.as_ref())
            .map(|m| m.amount.clone()),
        currency: Some(
            first
                .and_then(|v| v.price.as_ref())
                .map_or_else(|| DEFAULT_CURRENCY.to_string(), |m| m.currency_code.clone()),
        ),
        available: Some(first.and_then(|v| v.available_for_sale).unwrap_or(true)),
        quantity_available: first.and_then(|v| v.quantity_available),
        sku: first.and_then(|v| v.sku.clone()),
        images,
        variants: variants.into_iter().map(convert_variant).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        vendor: product.vendor,
        product_type: product.product_type.filter(|t| !t.is_empty()),
        tags: product.tags,
        ..ProductRecord::default()
    }
}

fn convert_variant(variant: GqlVariant) -> VariantRecord {
    VariantRecord {
        id: Some(variant.id),
        title: Some(variant.title),
        sku: variant.sku,
        price: variant.price.map(|m| m.amount),
        available: variant.available_for_sale,
        image: variant.image.map(|GqlImage { url, .. }| url),
        options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: Some(o.name),
                value: o.value,
            })
            .collect(),
    }
}
