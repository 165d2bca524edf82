//! Health and probe endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseStatus,
}

#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Body for the liveness and readiness probes.
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
}

/// Overall service health, including database reachability. Responds 503
/// with an `unhealthy` body when the database cannot be pinged.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let latency_ms = ping_database(&state.pool).await;
    let connected = latency_ms.is_some();

    let body = HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseStatus {
            connected,
            latency_ms,
        },
    };

    let code = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}

/// Liveness probe. Answers as long as the process is up.
pub async fn live() -> Json<ProbeResponse> {
    Json(ProbeResponse { status: "alive" })
}

/// Readiness probe. 503 until the database answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeResponse>, StatusCode> {
    if ping_database(&state.pool).await.is_some() {
        Ok(Json(ProbeResponse { status: "ready" }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn ping_database(pool: &PgPool) -> Option<u64> {
    let started = std::time::Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .ok()
        .map(|_| started.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_body_shape() {
        let body = HealthResponse {
            status: "healthy",
            version: "0.3.0",
            database: DatabaseStatus {
                connected: true,
                latency_ms: Some(4),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"]["connected"], true);
        assert_eq!(json["database"]["latency_ms"], 4);
    }

    #[test]
    fn test_unhealthy_body_reports_disconnected() {
        let body = HealthResponse {
            status: "unhealthy",
            version: "0.3.0",
            database: DatabaseStatus {
                connected: false,
                latency_ms: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["database"]["connected"], false);
        assert!(json["database"]["latency_ms"].is_null());
    }

    #[test]
    fn test_probe_body() {
        let json = serde_json::to_value(ProbeResponse { status: "alive" }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "alive" }));
    }
}
