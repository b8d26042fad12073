//! Handlers for the `/menus` resource.
//!
//! Menus are soft-deleted only. Any write that changes a slug cascades the
//! rename into the treatment hrefs of every active menu.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vitalis_core::error::CoreError;
use vitalis_core::slug::slugify;
use vitalis_core::types::DbId;
use vitalis_db::models::menu::{
    CreateMenu, Menu, MenuDraft, MenuUpdate, ReorderEntry, SelectorUpdate, UpdateMenu,
};
use vitalis_db::repositories::MenuRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::IncludeInactiveParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub matched: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/menus?include_inactive=false
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let menus = MenuRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(ApiResponse::ok(menus)))
}

/// GET /api/v1/menus/navbar
///
/// Active menus flagged for the navbar, in display order.
pub async fn navbar(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let menus = MenuRepo::list_navbar(&state.pool).await?;
    Ok(Json(ApiResponse::ok(menus)))
}

/// POST /api/v1/menus
///
/// Slug defaults to the slugified name; flat menus need a discover label.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateMenu>,
) -> AppResult<impl IntoResponse> {
    let draft = MenuDraft::try_from(input)?;
    let menu = MenuRepo::create(&state.pool, &draft).await?;
    state.site_cache.invalidate().await;
    tracing::info!(menu_id = menu.id, slug = %menu.slug, "Menu created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(menu))))
}

/// GET /api/v1/menus/{id}
///
/// Inactive menus are returned too.
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let menu = find_menu(&state, id).await?;
    Ok(Json(ApiResponse::ok(menu)))
}

/// GET /api/v1/menus/by-slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let normalized = slugify(&slug);
    let menu = MenuRepo::find_active_by_slug(&state.pool, &normalized)
        .await?
        .ok_or_else(|| CoreError::not_found_key("Menu", &normalized))?;
    Ok(Json(ApiResponse::ok(menu)))
}

/// PUT /api/v1/menus/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateMenu>,
) -> AppResult<impl IntoResponse> {
    let updated = save_revision(&state, id, &input).await?;
    Ok(Json(update_response(updated)))
}

/// PATCH /api/v1/menus
///
/// Update the menu identified by `selector` (`id`, `slug` or `name`).
pub async fn update_by_selector(
    State(state): State<AppState>,
    AppJson(body): AppJson<SelectorUpdate>,
) -> AppResult<impl IntoResponse> {
    let current = MenuRepo::find_by_selector(&state.pool, &body.selector)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Menu",
            key: body.selector.normalized().describe(),
        })?;
    let updated = save_revision(&state, current.id, &body.update).await?;
    Ok(Json(update_response(updated)))
}

/// PATCH /api/v1/menus/reorder
///
/// Apply `[{selector, sort_order}]` in one transaction.
pub async fn reorder(
    State(state): State<AppState>,
    AppJson(entries): AppJson<Vec<ReorderEntry>>,
) -> AppResult<impl IntoResponse> {
    if entries.is_empty() {
        return Err(AppError::BadRequest(
            "Reorder requires at least one entry".into(),
        ));
    }
    let matched = MenuRepo::reorder(&state.pool, &entries).await?;
    state.site_cache.invalidate().await;
    tracing::info!(requested = entries.len(), matched, "Menus reordered");
    Ok(Json(ApiResponse::ok(ReorderResult { matched })))
}

/// DELETE /api/v1/menus/{id}
///
/// Deactivate a menu (soft delete).
pub async fn deactivate(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MenuRepo::deactivate(&state.pool, id).await? {
        return Err(CoreError::not_found_id("Menu", id).into());
    }
    state.site_cache.invalidate().await;
    tracing::info!(menu_id = id, "Menu deactivated");
    Ok(Json(ApiResponse::with_message(id, "Menu deactivated")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_menu(state: &AppState, id: DbId) -> AppResult<Menu> {
    MenuRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found_id("Menu", id).into())
}

/// Revise the menu from its locked row and save it.
async fn save_revision(state: &AppState, id: DbId, input: &UpdateMenu) -> AppResult<MenuUpdate> {
    let updated = MenuRepo::revise(&state.pool, id, |menu| {
        menu.revise(input).map_err(AppError::from)
    })
    .await?
    .ok_or_else(|| CoreError::not_found_id("Menu", id))?;
    state.site_cache.invalidate().await;
    tracing::info!(menu_id = id, slug = %updated.menu.slug, "Menu updated");
    Ok(updated)
}

fn update_response(updated: MenuUpdate) -> ApiResponse<MenuUpdate> {
    match &updated.cascade {
        Some(cascade) => {
            let message = format!(
                "Slug renamed from '{}' to '{}'; {} menu(s) updated",
                cascade.old_slug, cascade.new_slug, cascade.menus_updated
            );
            ApiResponse::with_message(updated, message)
        }
        None => ApiResponse::ok(updated),
    }
}
