//! HTTP-level integration tests for the `/api/directors` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_entity, create_user, delete_auth, get, patch_json_auth, post_json_auth,
    put_json_auth,
};
use reel_db::Store;
use serde_json::json;

#[tokio::test]
async fn test_create_and_retrieve_director() {
    let store = Store::in_memory();
    let (user_id, token) = create_user(&store, "alice").await;

    let response = post_json_auth(
        common::build_test_app(store.clone()),
        "/api/directors",
        json!({ "name": "Akira Kurosawa", "birth_year": 1910 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["created_by"], user_id);
    let id = created["id"].as_i64().unwrap();

    let response = get(common::build_test_app(store), &format!("/api/directors/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Akira Kurosawa");
    assert_eq!(json["birth_year"], 1910);
    assert!(json["biography"].is_null());
}

#[tokio::test]
async fn test_birth_year_out_of_range_is_rejected() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;

    let response = post_json_auth(
        common::build_test_app(store.clone()),
        "/api/directors",
        json!({ "name": "Time Traveller", "birth_year": 1500 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["birth_year"].is_array());
    assert!(json["fields"].get("name").is_none());
    assert_eq!(store.directors.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_put_keeps_omitted_optional_fields() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;
    let id = create_entity(
        common::build_test_app(store.clone()),
        "/api/directors",
        json!({ "name": "Agnes Varda", "biography": "Left Bank", "birth_year": 1928 }),
        &token,
    )
    .await;

    let response = put_json_auth(
        common::build_test_app(store),
        &format!("/api/directors/{id}"),
        json!({ "name": "Agnès Varda" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Agnès Varda");
    assert_eq!(json["biography"], "Left Bank");
    assert_eq!(json["birth_year"], 1928);
}

#[tokio::test]
async fn test_referenced_director_cannot_be_deleted() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;
    let director_id = create_entity(
        common::build_test_app(store.clone()),
        "/api/directors",
        json!({ "name": "Michael Mann" }),
        &token,
    )
    .await;
    let movie_id = create_entity(
        common::build_test_app(store.clone()),
        "/api/movies",
        json!({ "title": "Heat", "director_id": director_id }),
        &token,
    )
    .await;
    let director_uri = format!("/api/directors/{director_id}");

    let response = delete_auth(common::build_test_app(store.clone()), &director_uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = get(common::build_test_app(store.clone()), &director_uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Once the movie is gone the director can go too.
    let response = delete_auth(
        common::build_test_app(store.clone()),
        &format!("/api/movies/{movie_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(common::build_test_app(store), &director_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_director_pagination() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;
    for i in 1..=13 {
        create_entity(
            common::build_test_app(store.clone()),
            "/api/directors",
            json!({ "name": format!("Director {i}") }),
            &token,
        )
        .await;
    }

    let response = get(common::build_test_app(store.clone()), "/api/directors").await;
    let json = body_json(response).await;
    assert_eq!(json["limit"], 12);
    assert_eq!(json["page_count"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 12);

    let response = get(common::build_test_app(store), "/api/directors?offset=2").await;
    let json = body_json(response).await;
    assert_eq!(json["offset"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Director 13");
}

#[tokio::test]
async fn test_explicit_null_clears_optional_fields() {
    let store = Store::in_memory();
    let (_, token) = create_user(&store, "alice").await;
    let id = create_entity(
        common::build_test_app(store.clone()),
        "/api/directors",
        json!({ "name": "Agnes Varda", "biography": "Left Bank", "birth_year": 1928 }),
        &token,
    )
    .await;
    let uri = format!("/api/directors/{id}");

    let response = patch_json_auth(
        common::build_test_app(store.clone()),
        &uri,
        json!({ "biography": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["biography"].is_null());
    assert_eq!(json["birth_year"], 1928);

    let response = put_json_auth(
        common::build_test_app(store.clone()),
        &uri,
        json!({ "name": "Agnes Varda", "birth_year": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["birth_year"].is_null());

    let response = get(common::build_test_app(store), &uri).await;
    let json = body_json(response).await;
    assert!(json["biography"].is_null());
    assert!(json["birth_year"].is_null());
    assert_eq!(json["name"], "Agnes Varda");
}
