//! Request ID propagation and per-request log correlation.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Incoming header consulted for a caller-supplied request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID made available to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Adopts the caller's `X-Request-ID` or generates a UUID v4, then runs the
/// rest of the stack inside a span carrying that ID. The ID is echoed back
/// on the response so clients can correlate logs.
pub async fn propagate_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = std::time::Instant::now();
    let mut response = async {
        let response = next.run(req).await;
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_cloneable() {
        let id = RequestId("abc-123".to_string());
        assert_eq!(id.clone().0, "abc-123");
    }

    #[test]
    fn test_echo_header_name_parses() {
        assert_eq!(HeaderName::from_static("x-request-id"), REQUEST_ID_HEADER);
    }
}
