use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::menus;
use crate::state::AppState;

/// Menu routes mounted at `/menus`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// PATCH  /                 -> update_by_selector
/// PATCH  /reorder          -> reorder
/// GET    /navbar           -> navbar
/// GET    /by-slug/{slug}   -> get_by_slug
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(menus::list)
                .post(menus::create)
                .patch(menus::update_by_selector),
        )
        .route("/reorder", patch(menus::reorder))
        .route("/navbar", get(menus::navbar))
        .route("/by-slug/{slug}", get(menus::get_by_slug))
        .route(
            "/{id}",
            get(menus::get_by_id)
                .put(menus::update)
                .delete(menus::deactivate),
        )
}
