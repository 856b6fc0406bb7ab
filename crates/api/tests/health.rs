//! `/health` plus behaviour shared by every route: request ids, CORS,
//! unknown paths and methods, non-JSON bodies.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, create_user, delete_auth, get, post_json_auth};
use reel_db::Store;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_store_reachable() {
    let response = get(common::build_test_app(Store::in_memory()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn health_is_not_under_api_prefix() {
    let response = get(common::build_test_app(Store::in_memory()), "/api/health").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn every_response_gets_a_uuid_request_id() {
    let app = common::build_test_app(Store::in_memory());
    let response = get(app, "/api/movies/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(request_id.matches('-').count(), 4);
}

#[tokio::test]
async fn caller_supplied_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = common::build_test_app(Store::in_memory())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/movies")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PATCH")
        .body(Body::empty())
        .unwrap();

    let response = common::build_test_app(Store::in_memory())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn unknown_path_is_404() {
    let response = get(common::build_test_app(Store::in_memory()), "/api/actors").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collections_accept_a_trailing_slash() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;

    let response = post_json_auth(
        common::build_test_app(store.clone()),
        "/api/genres/",
        json!({ "name": "Drama" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(common::build_test_app(store.clone()), "/api/genres/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    for uri in ["/api/directors/", "/api/movies/", "/api/users/"] {
        let response = get(common::build_test_app(store.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn non_integer_id_is_json_404() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;

    let response = get(common::build_test_app(store.clone()), "/api/genres/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = delete_auth(common::build_test_app(store), "/api/movies/1.5", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn collection_delete_is_405() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/genres")
        .body(Body::empty())
        .unwrap();

    let response = common::build_test_app(Store::in_memory())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn body_without_json_content_type_is_400() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/genres")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(r#"{"name":"Drama"}"#))
        .unwrap();

    let response = common::build_test_app(store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
