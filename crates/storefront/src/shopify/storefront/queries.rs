//! Storefront API query documents and response shapes.
//!
//! Queries are sent through `graphql_client`'s [`QueryBody`] envelope; the
//! response types below only describe the fields these documents select.

use graphql_client::QueryBody;
use serde::{Deserialize, Serialize};

/// Product summary for hotspots and product cards.
pub const PRODUCT_SUMMARY_QUERY: &str = r"
query ProductSummary($handle: String!) {
  product(handle: $handle) {
    id
    handle
    title
    description
    images(first: 3) {
      edges { node { url altText } }
    }
    variants(first: 5) {
      edges {
        node {
          id
          title
          availableForSale
          price { amount currencyCode }
          compareAtPrice { amount currencyCode }
        }
      }
    }
  }
}
";

/// Full product for the product page.
pub const PRODUCT_DETAIL_QUERY: &str = r"
query ProductDetail($handle: String!) {
  product(handle: $handle) {
    id
    handle
    title
    description
    descriptionHtml
    vendor
    productType
    tags
    options { name values }
    images(first: 10) {
      edges { node { url altText } }
    }
    variants(first: 20) {
      edges {
        node {
          id
          title
          sku
          availableForSale
          quantityAvailable
          selectedOptions { name value }
          image { url altText }
          price { amount currencyCode }
          compareAtPrice { amount currencyCode }
        }
      }
    }
  }
}
";

/// Variables shared by both product queries.
#[derive(Debug, Clone, Serialize)]
pub struct HandleVariables {
    pub handle: String,
}

/// Build the request body for a product query.
#[must_use]
pub fn product_query(
    operation_name: &'static str,
    query: &'static str,
    handle: &str,
) -> QueryBody<HandleVariables> {
    QueryBody {
        variables: HandleVariables {
            handle: handle.to_string(),
        },
        query,
        operation_name,
    }
}

/// `data` of a product query.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductByHandleData {
    pub product: Option<GqlProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: Vec<GqlOption>,
    #[serde(default)]
    pub images: Connection<GqlImage>,
    #[serde(default)]
    pub variants: Connection<GqlVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlVariant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub available_for_sale: Option<bool>,
    #[serde(default)]
    pub quantity_available: Option<i64>,
    #[serde(default)]
    pub selected_options: Vec<GqlSelectedOption>,
    #[serde(default)]
    pub image: Option<GqlImage>,
    #[serde(default)]
    pub price: Option<MoneyV2>,
    #[serde(default)]
    pub compare_at_price: Option<MoneyV2>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GqlSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GqlOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Storefront `MoneyV2`: decimal amount as a string plus ISO currency code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}
