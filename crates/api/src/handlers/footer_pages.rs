//! Handlers for the `/footer` resource.
//!
//! Footer pages are addressed by name, which is stored in slug form so the
//! public resolver can find them at `/{name}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vitalis_core::error::CoreError;
use vitalis_core::rules::footer_page_name;
use vitalis_db::models::footer_page::ReplaceFooterPage;
use vitalis_db::repositories::FooterPageRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/footer
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pages = FooterPageRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(pages)))
}

/// GET /api/v1/footer/{name}
///
/// Admin view: inactive pages are returned too.
pub async fn get(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let name = footer_page_name(&name)?;
    let page = FooterPageRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| CoreError::not_found_key("FooterPage", &name))?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/v1/footer/{name}
///
/// Create an empty, active page.
pub async fn create(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let name = footer_page_name(&name)?;
    let page = FooterPageRepo::create_empty(&state.pool, &name).await?;
    state.site_cache.invalidate().await;
    tracing::info!(name = %page.name, "Footer page created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(page))))
}

/// PUT /api/v1/footer/{name}
///
/// Replace the whole document: blocks and config.
pub async fn replace(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
    AppJson(doc): AppJson<ReplaceFooterPage>,
) -> AppResult<impl IntoResponse> {
    let name = footer_page_name(&name)?;
    doc.validate()?;
    let page = FooterPageRepo::replace(&state.pool, &name, &doc)
        .await?
        .ok_or_else(|| CoreError::not_found_key("FooterPage", &name))?;
    state.site_cache.invalidate().await;
    tracing::info!(name = %page.name, blocks = doc.blocks.len(), "Footer page replaced");
    Ok(Json(ApiResponse::ok(page)))
}

/// DELETE /api/v1/footer/{name}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let name = footer_page_name(&name)?;
    if !FooterPageRepo::delete(&state.pool, &name).await? {
        return Err(CoreError::not_found_key("FooterPage", &name).into());
    }
    state.site_cache.invalidate().await;
    tracing::info!(name = %name, "Footer page deleted");
    Ok(Json(ApiResponse::with_message(name, "Footer page deleted")))
}
