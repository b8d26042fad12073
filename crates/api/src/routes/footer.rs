use axum::routing::get;
use axum::Router;

use crate::handlers::footer_pages;
use crate::state::AppState;

/// Footer page routes mounted at `/footer`.
///
/// ```text
/// GET    /         -> list
/// GET    /{name}   -> get
/// POST   /{name}   -> create
/// PUT    /{name}   -> replace
/// DELETE /{name}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(footer_pages::list)).route(
        "/{name}",
        get(footer_pages::get)
            .post(footer_pages::create)
            .put(footer_pages::replace)
            .delete(footer_pages::delete),
    )
}
