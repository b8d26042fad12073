//! Liveness check, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Open connections in the pool, busy or idle.
    pub db_connections: u32,
    pub site_cache_warm: bool,
}

/// GET /health
///
/// Always 200 so the process stays in rotation while the database recovers;
/// page resolution reports the outage per request as 503.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = vitalis_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_connections: state.pool.size(),
        site_cache_warm: state.site_cache.is_warm().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
