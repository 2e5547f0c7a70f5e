//! Platform global IDs.
//!
//! The Storefront GraphQL API identifies objects with global IDs such as
//! `gid://shopify/ProductVariant/44012345678`, while the AJAX cart endpoints
//! expect the bare numeric tail. [`GlobalId`] parses the former and
//! [`normalize_variant_id`] bridges the two.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const GID_SCHEME: &str = "gid://";

/// Errors that can occur when parsing a global ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobalIdError {
    #[error("missing gid:// prefix: {0}")]
    MissingScheme(String),
    #[error("malformed global ID: {0}")]
    Malformed(String),
}

/// A parsed platform global ID (`gid://{namespace}/{resource}/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    namespace: String,
    resource: String,
    id: String,
}

impl GlobalId {
    /// The namespace, e.g. `shopify`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The resource type, e.g. `ProductVariant`.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The resource-local ID, e.g. `44012345678`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl FromStr for GlobalId {
    type Err = GlobalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(GID_SCHEME)
            .ok_or_else(|| GlobalIdError::MissingScheme(s.to_string()))?;

        // Query strings (e.g. `?key=...` on cart lines) are not part of the ID
        let rest = rest.split('?').next().unwrap_or(rest);

        // The ID is always the last segment; resources may nest
        let parsed = rest.split_once('/').and_then(|(namespace, tail)| {
            let (resource, id) = tail.rsplit_once('/')?;
            (!namespace.is_empty() && !resource.is_empty() && !id.is_empty()).then(|| Self {
                namespace: namespace.to_string(),
                resource: resource.to_string(),
                id: id.to_string(),
            })
        });
        parsed.ok_or_else(|| GlobalIdError::Malformed(s.to_string()))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GID_SCHEME}{}/{}/{}", self.namespace, self.resource, self.id)
    }
}

/// Reduce a variant ID to the numeric form the AJAX cart accepts.
///
/// Global IDs keep only their ID segment; anything without the `gid://`
/// scheme passes through unchanged. Blank input and malformed global IDs
/// yield `None`.
#[must_use]
pub fn normalize_variant_id(id: &str) -> Option<String> {
    let raw = id.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<GlobalId>() {
        Ok(gid) => Some(gid.id().to_string()),
        Err(GlobalIdError::MissingScheme(_)) => Some(raw.to_string()),
        Err(GlobalIdError::Malformed(_)) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_gid() {
        let gid: GlobalId = "gid://shopify/ProductVariant/42".parse().unwrap();
        assert_eq!(gid.namespace(), "shopify");
        assert_eq!(gid.resource(), "ProductVariant");
        assert_eq!(gid.id(), "42");
        assert_eq!(gid.to_string(), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_parse_strips_query() {
        let gid: GlobalId = "gid://shopify/CartLine/abc?cart=xyz".parse().unwrap();
        assert_eq!(gid.id(), "abc");
    }

    #[test]
    fn test_parse_rejects_plain_ids() {
        assert_eq!(
            "12345".parse::<GlobalId>(),
            Err(GlobalIdError::MissingScheme("12345".to_string()))
        );
        assert!(matches!(
            "gid://shopify/Product".parse::<GlobalId>(),
            Err(GlobalIdError::Malformed(_))
        ));
    }

    #[test]
    fn test_nested_resource_keeps_last_segment() {
        let gid: GlobalId = "gid://shopify/Cart/Line/77".parse().unwrap();
        assert_eq!(gid.resource(), "Cart/Line");
        assert_eq!(gid.id(), "77");
    }

    #[test]
    fn test_normalize_variant_id() {
        assert_eq!(
            normalize_variant_id("gid://shopify/ProductVariant/42").as_deref(),
            Some("42")
        );
        assert_eq!(
            normalize_variant_id(" gid://shopify/ProductVariant/42?cart=abc ").as_deref(),
            Some("42")
        );
        assert_eq!(normalize_variant_id("42").as_deref(), Some("42"));
        assert_eq!(normalize_variant_id("  "), None);
        assert_eq!(normalize_variant_id("gid://shopify/ProductVariant"), None);
    }
}
