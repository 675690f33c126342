//! Request tracing middleware.
//!
//! Provides request ID extraction and generation for log correlation.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Middleware that extracts or generates a request ID.
///
/// If the `X-Request-ID` header is present, uses that value; otherwise a
/// new UUID v4 is generated. The ID is stored in request extensions, echoed
/// on the response, and attached to the request's tracing span.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let response_id = request_id.clone();
    async move {
        let start = std::time::Instant::now();

        let mut response = next.run(req).await;

        let duration_ms = start.elapsed().as_millis();
        let status = response.status().as_u16();

        tracing::info!(
            request_id = %request_id,
            status = status,
            duration_ms = %duration_ms,
            "Request completed"
        );

        if let Ok(header_value) = HeaderValue::from_str(&response_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
        }

        response
    }
    .instrument(span)
    .await
}
