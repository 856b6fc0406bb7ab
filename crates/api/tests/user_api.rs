//! HTTP-level integration tests for the `/api/users` listing.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_admin, create_user, get};
use reel_db::Store;

#[tokio::test]
async fn test_list_users_is_public_and_hides_secrets() {
    let store = Store::in_memory();
    let (alice_id, _) = create_user(&store, "alice").await;
    create_admin(&store, "root").await;

    let response = get(common::build_test_app(store), "/api/users").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["page_count"], 1);

    let first = &json["data"][0];
    assert_eq!(first["id"], alice_id);
    assert_eq!(first["username"], "alice");
    assert_eq!(first["role"], "user");
    assert_eq!(first["is_active"], true);
    assert!(first.get("password_hash").is_none());
    assert!(first.get("email").is_none());

    assert_eq!(json["data"][1]["role"], "admin");
}

#[tokio::test]
async fn test_list_users_paginates() {
    let store = Store::in_memory();
    for name in ["u1", "u2", "u3"] {
        create_user(&store, name).await;
    }

    let response = get(common::build_test_app(store.clone()), "/api/users?limit=2&offset=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page_count"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["username"], "u3");

    let response = get(common::build_test_app(store), "/api/users?limit=2&offset=3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_have_no_detail_route() {
    let store = Store::in_memory();
    let (id, _) = create_user(&store, "alice").await;

    let response = get(common::build_test_app(store), &format!("/api/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
