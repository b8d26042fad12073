use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes mounted at `/products`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /by-key/{category}/{slug}  -> get_by_key
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/by-key/{category}/{slug}", get(products::get_by_key))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}
