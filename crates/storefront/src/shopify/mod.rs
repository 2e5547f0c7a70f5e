//! Shopify clients.
//!
//! # Clients
//!
//! - [`StorefrontClient`]: Storefront GraphQL API, used when a storefront
//!   access token is configured.
//! - [`PublicProductClient`]: the shop's public `/products/{handle}.js`
//!   endpoint, used when no token is available.
//! - [`AjaxCartClient`]: the shop's AJAX cart endpoints (`/cart/add.js`,
//!   `/cart/change.js`, section rendering). Requests carry the shopper's
//!   cookie so the shop sees its own cart session.
//!
//! Every client returns [`ProductRecord`](cozyspot_core::ProductRecord)s;
//! callers never see the wire shapes.

mod cart;
mod public;
mod storefront;

pub use cart::{AjaxCartClient, CartSection, parse_cart_count};
pub use public::{PublicImage, PublicProduct, PublicProductClient, PublicVariant};
pub use storefront::StorefrontClient;

use thiserror::Error;

/// Errors that can occur when talking to the shop.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The shop origin cannot carry a product path.
    #[error("Invalid shop URL: {0}")]
    InvalidUrl(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-GraphQL endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect(),
            path: e
                .path
                .unwrap_or_default()
                .into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect(),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// `{origin}{base}/{handle}.js`.
///
/// The handle is percent-encoded as one path segment, so `/`, `?` and `#`
/// in it cannot reach another endpoint.
fn product_json_url(origin: &str, base: &str, handle: &str) -> Result<String, ShopifyError> {
    let mut url =
        url::Url::parse(origin).map_err(|e| ShopifyError::InvalidUrl(format!("{origin}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ShopifyError::InvalidUrl(origin.to_string()))?
        .pop_if_empty()
        .extend(base.split('/').filter(|s| !s.is_empty()))
        .push(&format!("{handle}.js"));
    Ok(url.into())
}

/// Truncate a response body for log output.
fn body_excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}
