//! Public read routes: page resolution and the site snapshot.

use axum::routing::get;
use axum::Router;

use crate::handlers::{pages, site};
use crate::state::AppState;

/// ```text
/// GET /pages/{slug}   -> pages::resolve
/// GET /site           -> site::snapshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pages/{slug}", get(pages::resolve))
        .route("/site", get(site::snapshot))
}
