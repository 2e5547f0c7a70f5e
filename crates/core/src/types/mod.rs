//! Core types for CozySpot.
//!
//! This module provides normalized product shapes and the helpers that turn
//! them into display-ready values.

pub mod asset;
pub mod de;
pub mod display;
pub mod id;
pub mod money;
pub mod product;

pub use asset::AssetResolver;
pub use display::{DisplayProduct, RatingData, RatingEntry, Ratings};
pub use id::{GlobalId, GlobalIdError, normalize_variant_id};
pub use money::{
    currency_symbol, format_money_from_cent_str, format_money_from_cents, format_money_value,
    parse_price_value,
};
pub use product::{ProductOption, ProductRecord, SelectedOption, VariantRecord};
