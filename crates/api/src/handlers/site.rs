//! Site navigation snapshot.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::cache::SiteSnapshot;
use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/site
///
/// Navbar, plan cards and footer links, served from [`crate::cache::SiteCache`].
pub async fn snapshot(State(state): State<AppState>) -> AppResult<Response> {
    let pool = &state.pool;
    let snapshot = state
        .site_cache
        .get_or_load(|| SiteSnapshot::load(pool))
        .await?;
    Ok(Json(ApiResponse::ok(snapshot.as_ref())).into_response())
}
