//! Prometheus export and HTTP request instrumentation.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];

/// Records `http_requests_total` and `http_request_duration_seconds` for
/// every request, labelled by method, matched route, and status.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = method_label(req.method());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// Bounded label set; unknown methods collapse into a single bucket.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Record a donation entering the pool.
pub fn record_donation_published() {
    counter!("donations_published_total").increment(1);
}

/// Record a successful reservation.
pub fn record_donation_reserved() {
    counter!("donations_reserved_total").increment(1);
}

/// Record a cancelled reservation.
pub fn record_reservation_cancelled() {
    counter!("reservations_cancelled_total").increment(1);
}

/// Record a completed pickup.
pub fn record_donation_picked_up() {
    counter!("donations_picked_up_total").increment(1);
}

/// Serves the Prometheus text exposition for scraping.
pub async fn metrics_handler() -> Response {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Metrics not initialized",
        )
            .into_response(),
    }
}

/// Installs the global Prometheus recorder. Call once at startup, before
/// the first request is served.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)
        .expect("histogram buckets are non-empty")
        .install_recorder()
        .expect("Prometheus recorder already installed");

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        panic!("init_metrics called twice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_known_methods() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::POST), "POST");
        assert_eq!(method_label(&Method::PATCH), "PATCH");
        assert_eq!(method_label(&Method::DELETE), "DELETE");
    }

    #[test]
    fn test_method_label_collapses_unknown() {
        assert_eq!(method_label(&Method::TRACE), "OTHER");
        assert_eq!(method_label(&Method::CONNECT), "OTHER");
    }

    #[test]
    fn test_latency_buckets_ascend() {
        assert!(LATENCY_BUCKETS.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
