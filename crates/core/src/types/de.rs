//! Lenient `serde` helpers for hand-edited JSON.
//!
//! Site data and fallback fields are maintained by hand, so prices, ratings,
//! positions and IDs show up as numbers in one file and strings in the next.
//! These helpers accept either and keep the value as a string. List fields
//! go through [`vec_or_empty`] so one bad entry cannot sink a whole file.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional string that may be written as a JSON number.
///
/// `null`, arrays and objects become `None`; empty strings are kept.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_string))
}

/// Deserialize an optional integer that may be written as a numeric string.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
#[allow(clippy::cast_possible_truncation)] // Whole-number floats only
pub fn opt_i64_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            // Float cents like 1999.0 still count as whole minor units.
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize a list leniently.
///
/// `null` or a non-array value becomes an empty `Vec`, and entries that do
/// not deserialize as `T` are skipped.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserialize a string-keyed map leniently, like [`vec_or_empty`].
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn map_or_empty<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(entries)) => entries
            .into_iter()
            .filter_map(|(key, item)| serde_json::from_value(item).ok().map(|v| (key, v)))
            .collect(),
        _ => HashMap::new(),
    })
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::opt_string_or_number")]
        price: Option<String>,
        #[serde(default, deserialize_with = "super::opt_i64_lenient")]
        cents: Option<i64>,
        #[serde(default, deserialize_with = "super::vec_or_empty")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "super::map_or_empty")]
        stock: std::collections::HashMap<String, u32>,
    }

    #[test]
    fn test_number_becomes_string() {
        let s: Sample = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
        assert_eq!(s.price.as_deref(), Some("19.99"));
    }

    #[test]
    fn test_string_is_kept() {
        let s: Sample = serde_json::from_str(r#"{"price": "N/A"}"#).unwrap();
        assert_eq!(s.price.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_missing_and_null() {
        let s: Sample = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert!(s.price.is_none());
        let s: Sample = serde_json::from_str("{}").unwrap();
        assert!(s.price.is_none());
        assert!(s.cents.is_none());
    }

    #[test]
    fn test_lenient_integers() {
        let s: Sample = serde_json::from_str(r#"{"cents": "1999"}"#).unwrap();
        assert_eq!(s.cents, Some(1999));
        let s: Sample = serde_json::from_str(r#"{"cents": 1999.0}"#).unwrap();
        assert_eq!(s.cents, Some(1999));
        let s: Sample = serde_json::from_str(r#"{"cents": "free"}"#).unwrap();
        assert_eq!(s.cents, None);
    }

    #[test]
    fn test_lists_tolerate_null_and_bad_entries() {
        let s: Sample = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(s.tags.is_empty());
        let s: Sample = serde_json::from_str(r#"{"tags": "cozy"}"#).unwrap();
        assert!(s.tags.is_empty());
        let s: Sample = serde_json::from_str(r#"{"tags": ["cozy", 4, "warm"]}"#).unwrap();
        assert_eq!(s.tags, vec!["cozy", "warm"]);
    }

    #[test]
    fn test_maps_skip_bad_entries() {
        let s: Sample = serde_json::from_str(r#"{"stock": {"lamp": 3, "rug": "many"}}"#).unwrap();
        assert_eq!(s.stock.len(), 1);
        assert_eq!(s.stock["lamp"], 3);
        let s: Sample = serde_json::from_str(r#"{"stock": null}"#).unwrap();
        assert!(s.stock.is_empty());
    }
}
