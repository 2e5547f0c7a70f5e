//! Display model derived from product records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::asset::AssetResolver;
use super::de::opt_string_or_number;
use super::money::currency_symbol;
use super::product::ProductRecord;

/// Names longer than this many characters are truncated for display.
pub const NAME_DISPLAY_LIMIT: usize = 24;

/// Variant titles shown in the variants label.
pub const VARIANT_LABEL_LIMIT: usize = 3;

/// Symbol used when a product carries no currency at all.
pub const FALLBACK_CURRENCY_SYMBOL: &str = "€";

const PLACEHOLDER_NAME: &str = "Product";
const DEFAULT_VARIANT_TITLE: &str = "default title";

/// One entry of the global ratings lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub count: Option<String>,
}

/// Ratings keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(HashMap<String, RatingEntry>);

impl Ratings {
    /// Look up the entry for a product ID.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&RatingEntry> {
        self.0.get(product_id)
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, product_id: impl Into<String>, entry: RatingEntry) {
        self.0.insert(product_id.into(), entry);
    }
}

/// Rating value and review count, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingData {
    pub rating: String,
    pub count: String,
}

impl RatingData {
    /// Pick the rating for a product: lookup entry first, then the record's
    /// own fields, then `0.0` / `0`.
    #[must_use]
    pub fn for_record(record: &ProductRecord, ratings: &Ratings) -> Self {
        let entry = record.id.as_deref().and_then(|id| ratings.get(id));

        Self {
            rating: entry
                .and_then(|e| e.rating.clone())
                .or_else(|| record.rating.clone())
                .unwrap_or_else(|| "0.0".to_string()),
            count: entry
                .and_then(|e| e.count.clone())
                .or_else(|| record.reviews_count.clone())
                .unwrap_or_else(|| "0".to_string()),
        }
    }
}

/// The normalized shape consumed by rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProduct {
    pub handle: Option<String>,
    pub raw_name: String,
    pub name: String,
    pub image: String,
    pub price: Option<String>,
    pub currency_symbol: String,
    pub rating: RatingData,
    pub link: Option<String>,
    pub has_variants: bool,
    pub variants_label: String,
}

impl DisplayProduct {
    /// Build the display model for a record.
    #[must_use]
    pub fn from_record(record: &ProductRecord, ratings: &Ratings, assets: &AssetResolver) -> Self {
        let raw_name = record.name().unwrap_or(PLACEHOLDER_NAME).to_string();
        let variant_titles: Vec<&str> = record
            .variants
            .iter()
            .filter_map(|v| v.title.as_deref())
            .filter(|t| !t.is_empty())
            .collect();
        let has_variants = has_real_variants(&variant_titles);

        Self {
            handle: record.handle.clone(),
            name: truncate_name(&raw_name),
            raw_name,
            image: record.image.clone().unwrap_or_default(),
            price: record
                .price
                .clone()
                .filter(|p| !p.is_empty() && p != "N/A"),
            currency_symbol: currency_symbol(record.currency.as_deref(), FALLBACK_CURRENCY_SYMBOL),
            rating: RatingData::for_record(record, ratings),
            link: record.link.clone().or_else(|| {
                record
                    .handle
                    .as_deref()
                    .filter(|h| !h.is_empty() && *h != "#")
                    .map(|h| assets.product_url(Some(h)))
            }),
            has_variants,
            variants_label: if has_variants {
                variants_label(&variant_titles)
            } else {
                String::new()
            },
        }
    }
}

/// Truncate a name to [`NAME_DISPLAY_LIMIT`] characters, appending `...`.
#[must_use]
pub fn truncate_name(raw: &str) -> String {
    if raw.chars().count() > NAME_DISPLAY_LIMIT {
        let head: String = raw.chars().take(NAME_DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        raw.to_string()
    }
}

fn has_real_variants(titles: &[&str]) -> bool {
    match titles {
        [] => false,
        [only] => !only.eq_ignore_ascii_case(DEFAULT_VARIANT_TITLE),
        _ => true,
    }
}

fn variants_label(titles: &[&str]) -> String {
    let shown: Vec<&str> = titles.iter().take(VARIANT_LABEL_LIMIT).copied().collect();
    format!("Variants: {}", shown.join(" • "))
}
