//! Handlers for the `/products` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vitalis_core::error::CoreError;
use vitalis_core::slug::slugify;
use vitalis_core::types::DbId;
use vitalis_db::models::product::{
    CreateProduct, Product, ProductDraft, ProductFilter, UpdateProduct,
};
use vitalis_db::repositories::ProductRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/products?category=&show_in_plans=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(mut filter): AppQuery<ProductFilter>,
) -> AppResult<impl IntoResponse> {
    filter.category = filter.category.as_deref().map(slugify);
    let products = ProductRepo::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let draft = ProductDraft::try_from(input)?;
    let product = ProductRepo::create(&state.pool, &draft).await?;
    state.site_cache.invalidate().await;
    tracing::info!(
        product_id = product.id,
        category = %product.category,
        slug = %product.slug,
        "Product created",
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = find_product(&state, id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// GET /api/v1/products/by-key/{category}/{slug}
pub async fn get_by_key(
    State(state): State<AppState>,
    AppPath((category, slug)): AppPath<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let (category, slug) = (slugify(&category), slugify(&slug));
    let product = ProductRepo::find_by_key(&state.pool, &category, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found_key("Product", format!("{category}/{slug}")))?;
    Ok(Json(ApiResponse::ok(product)))
}

/// PUT /api/v1/products/{id}
///
/// Partial update; omitted fields keep their current values.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    let current = find_product(&state, id).await?;
    let draft = current.revise(&input)?;
    let product = ProductRepo::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| CoreError::not_found_id("Product", id))?;
    state.site_cache.invalidate().await;
    Ok(Json(ApiResponse::ok(product)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found_id("Product", id).into());
    }
    state.site_cache.invalidate().await;
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(ApiResponse::with_message(id, "Product deleted")))
}

async fn find_product(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found_id("Product", id).into())
}
