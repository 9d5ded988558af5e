//! Health check endpoints
//!
//! - /api/health - Basic health check
//! - /api/health/ready - Readiness probe (checks the database)
//! - /api/health/live - Liveness probe

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use dahiraa_shared::{CheckStatus, HealthChecks, HealthResponse};

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

fn status(status: &str) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        checks: None,
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(status("OK"))
}

/// Readiness probe. 503 when the database does not answer.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = match db::health_check(state.db()).await {
        Ok(_) => CheckStatus {
            status: "healthy".to_string(),
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(e.to_string()),
        },
    };

    let is_healthy = db_check.status == "healthy";
    let response = HealthResponse {
        checks: Some(HealthChecks { database: db_check }),
        ..status(if is_healthy { "ready" } else { "not_ready" })
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe; always OK while the process serves requests
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(status("alive"))
}
