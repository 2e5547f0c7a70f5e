//! Request ID middleware.
//!
//! Reuses an upstream `x-request-id` when present, otherwise generates a UUID
//! v4. The ID is stored as a [`RequestId`] extension (the trace layer reads it
//! when building the request span), tagged on the Sentry scope, and echoed in
//! the response headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The HTTP header carrying request IDs.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream ID accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The request's correlation ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_request(request: &Request) -> Self {
        let upstream = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_ID_LEN);

        Self(upstream.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a [`RequestId`] to the request and its response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&request);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    request.extensions_mut().insert(request_id.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}
