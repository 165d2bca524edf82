//! HTTP middleware: logging setup, metrics, security headers, request IDs.

pub mod logging;
pub mod metrics;
pub mod request_id;
pub mod security_headers;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use request_id::{propagate_request_id, RequestId, REQUEST_ID_HEADER};
pub use security_headers::security_headers_middleware;
