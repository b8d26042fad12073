//! HTTP behaviour that does not need a live database.
//!
//! Requests here are rejected or answered before any query succeeds, so the
//! app runs over a pool that cannot connect.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_offline_app, delete, get, patch_json, post_json, post_raw_json, put_json,
};
use serde_json::json;
use tower::ServiceExt;
use vitalis_api::router::REQUEST_ID_HEADER;

// ---------------------------------------------------------------------------
// Routing and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_offline_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let response = get(build_offline_app(), "/api/v1/menus/abc").await;
    let request_id = response.headers().get("x-request-id");
    assert!(request_id.is_some(), "Response must contain an x-request-id header");
    assert_eq!(request_id.unwrap().to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "editor-42")
        .body(Body::empty())
        .unwrap();
    let response = build_offline_app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "editor-42"
    );
}

#[tokio::test]
async fn wrong_method_returns_405() {
    let response = get(build_offline_app(), "/api/v1/menus/reorder").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_degraded_database() {
    let response = get(build_offline_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["site_cache_warm"], false);
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Extractor rejections use the error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_id_returns_400() {
    let response = get(build_offline_app(), "/api/v1/products/semaglutide").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let response = post_raw_json(build_offline_app(), "/api/v1/menus", "{\"name\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_required_field_returns_400() {
    let response = post_json(build_offline_app(), "/api/v1/products", json!({"label": "X"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_query_parameter_returns_400() {
    let response = get(build_offline_app(), "/api/v1/menus?include_inactive=maybe").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Domain validation happens before any write
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flat_menu_without_discover_label_is_rejected() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/menus",
        json!({"name": "Weight Loss", "layout": {"type": "flat", "treatments": []}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("discover.label"));
}

#[tokio::test]
async fn product_price_without_unit_is_rejected() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/products",
        json!({"category": "hair", "label": "Finasteride", "price": 25}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn empty_reorder_is_rejected() {
    let response = patch_json(build_offline_app(), "/api/v1/menus/reorder", json!([])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_footer_block_is_rejected() {
    let response = put_json(
        build_offline_app(),
        "/api/v1/footer/terms",
        json!({"blocks": [{"type": "carousel"}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unusable_footer_name_is_rejected() {
    let response = delete(build_offline_app(), "/api/v1/footer/%20--%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Database outage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_resolution_reports_unavailable_not_missing() {
    let response = get(build_offline_app(), "/api/v1/pages/weight-loss").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn blank_page_slug_is_not_found_without_a_lookup() {
    let response = get(build_offline_app(), "/api/v1/pages/---").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
