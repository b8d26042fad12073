pub mod footer;
pub mod health;
pub mod menus;
pub mod pages;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /menus                                   list, create, update by selector (PATCH)
/// /menus/reorder                           bulk reorder (PATCH)
/// /menus/navbar                            active navbar menus
/// /menus/by-slug/{slug}                    active menu by slug
/// /menus/{id}                              get, update, deactivate
///
/// /products                                list (?category=&show_in_plans=), create
/// /products/by-key/{category}/{slug}       product by natural key
/// /products/{id}                           get, update, delete
///
/// /footer                                  list
/// /footer/{name}                           get, create, replace, delete
///
/// /pages/{slug}                            public page resolution
/// /site                                    cached navigation snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/menus", menus::router())
        .nest("/products", products::router())
        .nest("/footer", footer::router())
        .merge(pages::router())
}
