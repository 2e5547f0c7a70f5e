//! Money and currency normalization.
//!
//! The commerce platform reports prices in two shapes: integer minor units
//! (cents) from the public product JSON, and decimal strings from the
//! Storefront GraphQL API. Both are normalized to two-decimal display strings.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount of minor units (cents) as a two-decimal string.
///
/// Returns `None` when no amount is present.
///
/// ```
/// # use cozyspot_core::format_money_from_cents;
/// assert_eq!(format_money_from_cents(Some(1999)).as_deref(), Some("19.99"));
/// assert_eq!(format_money_from_cents(None), None);
/// ```
#[must_use]
pub fn format_money_from_cents(cents: Option<i64>) -> Option<String> {
    cents.map(|c| to_fixed_2(Decimal::new(c, 2)))
}

/// Format a numeric string of minor units as a two-decimal string.
///
/// Returns `None` when the string is not numeric.
#[must_use]
pub fn format_money_from_cent_str(cents: &str) -> Option<String> {
    parse_price_value(cents).map(|value| to_fixed_2(value / Decimal::ONE_HUNDRED))
}

/// Parse a decimal price value, ignoring surrounding whitespace.
#[must_use]
pub fn parse_price_value(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Map an ISO 4217 code to its display symbol.
///
/// Only EUR and USD have symbols; any other non-empty code is returned as-is,
/// and an absent or empty code yields `fallback`.
#[must_use]
pub fn currency_symbol(code: Option<&str>, fallback: &str) -> String {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return fallback.to_string();
    };

    match code.to_ascii_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        _ => code.to_string(),
    }
}

/// Format a decimal amount followed by its currency symbol (e.g. `19.99€`).
///
/// Returns an empty string when the amount is absent or not numeric.
#[must_use]
pub fn format_money_value(amount: Option<&str>, currency_code: Option<&str>, fallback: &str) -> String {
    let Some(value) = amount.and_then(parse_price_value) else {
        return String::new();
    };
    let symbol = currency_symbol(currency_code, fallback);
    format!("{}{symbol}", to_fixed_2(value))
}

fn to_fixed_2(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_to_decimal_string() {
        assert_eq!(format_money_from_cents(Some(1999)).as_deref(), Some("19.99"));
        assert_eq!(format_money_from_cents(Some(5)).as_deref(), Some("0.05"));
        assert_eq!(format_money_from_cents(Some(0)).as_deref(), Some("0.00"));
        assert_eq!(format_money_from_cents(Some(120_000)).as_deref(), Some("1200.00"));
    }

    #[test]
    fn test_missing_cents() {
        assert_eq!(format_money_from_cents(None), None);
    }

    #[test]
    fn test_cent_strings() {
        assert_eq!(format_money_from_cent_str("1999").as_deref(), Some("19.99"));
        assert_eq!(format_money_from_cent_str(" 250 ").as_deref(), Some("2.50"));
        assert_eq!(format_money_from_cent_str("abc"), None);
        assert_eq!(format_money_from_cent_str(""), None);
    }

    #[test]
    fn test_parse_price_value() {
        assert_eq!(parse_price_value("19.99"), Some(Decimal::new(1999, 2)));
        assert_eq!(parse_price_value("N/A"), None);
    }

    #[test]
    fn test_currency_symbol_mapping() {
        assert_eq!(currency_symbol(Some("EUR"), "$"), "€");
        assert_eq!(currency_symbol(Some("usd"), "€"), "$");
        assert_eq!(currency_symbol(Some("Usd"), "€"), "$");
        assert_eq!(currency_symbol(Some("GBP"), "$"), "GBP");
    }

    #[test]
    fn test_currency_symbol_fallback() {
        assert_eq!(currency_symbol(None, "€"), "€");
        assert_eq!(currency_symbol(Some(""), "$"), "$");
    }

    #[test]
    fn test_format_money_value() {
        assert_eq!(format_money_value(Some("19.9"), Some("EUR"), "$"), "19.90€");
        assert_eq!(format_money_value(Some("5"), None, "$"), "5.00$");
        assert_eq!(format_money_value(None, Some("USD"), "$"), "");
        assert_eq!(format_money_value(Some("free"), Some("USD"), "$"), "");
    }
}
