use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, propagate_request_id, security_headers_middleware,
};
use crate::routes::{donations, establishments, food_banks, health};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: Arc::clone(&config),
    };

    Router::new()
        .merge(ops_routes())
        .merge(donation_routes())
        .merge(directory_routes())
        // Layers wrap bottom-up: CORS, added last, is outermost; the
        // security headers sit closest to the routes
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(propagate_request_id))
        .layer(build_cors(&config.security.cors_origins))
        .with_state(state)
}

/// Donation lifecycle endpoints. The static `/donations/reserved` segment
/// takes precedence over the `:donation_id` capture, so both can coexist.
fn donation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/donations",
            post(donations::create_donation).get(donations::list_donations),
        )
        .route(
            "/api/v1/donations/reserved",
            get(donations::list_reserved_donations),
        )
        .route(
            "/api/v1/donations/:donation_id",
            get(donations::get_donation)
                .put(donations::update_donation)
                .delete(donations::delete_donation),
        )
        .route(
            "/api/v1/donations/:donation_id/reserve/:food_bank_id",
            post(donations::reserve_donation),
        )
        .route(
            "/api/v1/donations/:donation_id/cancel/:food_bank_id",
            post(donations::cancel_reservation),
        )
        .route(
            "/api/v1/donations/:donation_id/pickup",
            post(donations::pick_up_donation),
        )
}

/// Establishment and food bank read-side endpoints.
fn directory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/establishments/:establishment_id",
            get(establishments::get_establishment),
        )
        .route(
            "/api/v1/establishments/:establishment_id/donations",
            get(establishments::list_establishment_donations),
        )
        .route(
            "/api/v1/food-banks/:food_bank_id",
            get(food_banks::get_food_bank),
        )
        .route(
            "/api/v1/food-banks/:food_bank_id/donations",
            get(food_banks::list_food_bank_donations),
        )
}

/// Probes and the Prometheus scrape endpoint.
fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
}

fn build_cors(origins: &[String]) -> CorsLayer {
    // An empty list is the development default: any origin may call
    let allow = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods(Any)
        .allow_headers(Any)
}
