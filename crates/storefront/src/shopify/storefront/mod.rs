//! Shopify Storefront API client.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Responses are not cached here; caching happens in the resolver so
//! every product source shares one cache.

mod conversions;
mod queries;

use std::sync::Arc;

use cozyspot_core::ProductRecord;
use graphql_client::{QueryBody, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::StorefrontCredentials;
use crate::shopify::{GraphQLError, ShopifyError, body_excerpt};

use conversions::convert_product;
use queries::{PRODUCT_DETAIL_QUERY, PRODUCT_SUMMARY_QUERY, ProductByHandleData, product_query};

/// Header carrying the public Storefront access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a client for the store's Storefront API.
    #[must_use]
    pub fn new(credentials: &StorefrontCredentials, client: reqwest::Client) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            credentials.store, credentials.api_version
        );
        Self::with_endpoint(endpoint, credentials.token.clone(), client)
    }

    /// Create a client for an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: SecretString,
        client: reqwest::Client,
    ) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: endpoint.into(),
                access_token,
            }),
        }
    }

    /// The GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query.
    async fn execute<V, R>(&self, body: &QueryBody<V>) -> Result<R, ShopifyError>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %body_excerpt(&response_text, 500),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.inner.endpoint.clone(),
            });
        }

        let response: Response<R> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(
                error = %e,
                body = %body_excerpt(&response_text, 500),
                "Failed to parse Storefront GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(GraphQLError::from).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| ShopifyError::GraphQL(vec![GraphQLError::from_message("No data in response")]))
    }

    /// Get the product summary used for hotspots and product cards.
    ///
    /// Returns `Ok(None)` if the store has no product with this handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_summary(
        &self,
        handle: &str,
    ) -> Result<Option<ProductRecord>, ShopifyError> {
        let body = product_query("ProductSummary", PRODUCT_SUMMARY_QUERY, handle);
        let data: ProductByHandleData = self.execute(&body).await?;
        Ok(data.product.map(convert_product))
    }

    /// Get the full product for the product page.
    ///
    /// Returns `Ok(None)` if the store has no product with this handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_detail(
        &self,
        handle: &str,
    ) -> Result<Option<ProductRecord>, ShopifyError> {
        let body = product_query("ProductDetail", PRODUCT_DETAIL_QUERY, handle);
        let data: ProductByHandleData = self.execute(&body).await?;
        Ok(data.product.map(convert_product))
    }
}
