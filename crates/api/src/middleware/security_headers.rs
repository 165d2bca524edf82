//! Response hardening headers.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Headers stamped on every response.
const BASE_HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
];

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Adds browser hardening headers to every response.
///
/// `Strict-Transport-Security` is opt-in through `FB__SECURITY__HSTS_ENABLED`
/// and belongs only behind HTTPS termination.
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let map = response.headers_mut();

    for (name, value) in BASE_HEADERS {
        map.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if hsts_enabled() {
        map.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}

fn hsts_enabled() -> bool {
    std::env::var("FB__SECURITY__HSTS_ENABLED")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_headers_are_valid_pairs() {
        for (name, value) in BASE_HEADERS {
            assert_eq!(HeaderName::from_static(name).as_str(), name);
            assert!(HeaderValue::from_static(value).to_str().is_ok());
        }
    }

    #[test]
    fn test_hsts_value_is_valid() {
        assert!(HeaderValue::from_static(HSTS_VALUE).to_str().is_ok());
        assert_eq!(
            header::STRICT_TRANSPORT_SECURITY.as_str(),
            "strict-transport-security"
        );
    }

    #[test]
    fn test_hsts_flag_accepts_any_casing_of_true() {
        for (raw, enabled) in [
            ("true", true),
            ("TRUE", true),
            ("True", true),
            ("false", false),
            ("1", false),
            ("", false),
        ] {
            assert_eq!(raw.eq_ignore_ascii_case("true"), enabled, "input {raw:?}");
        }
    }
}
