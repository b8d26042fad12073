//! Public page resolution: `/pages/{slug}` serves either a menu page or a
//! footer page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use vitalis_core::error::CoreError;
use vitalis_core::resolution::PageOutcome;

use crate::error::AppResult;
use crate::extract::AppPath;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/pages/{slug}
///
/// 404 only when neither a menu nor a footer page exists; a store that
/// cannot be reached yields 503.
pub async fn resolve(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    match state.resolver().resolve(&slug).await {
        PageOutcome::Found(view) => Ok(Json(ApiResponse::ok(view))),
        PageOutcome::NotFound => Err(CoreError::not_found_key("Page", &slug).into()),
        PageOutcome::Unavailable(reason) => Err(CoreError::Unavailable(reason).into()),
    }
}
