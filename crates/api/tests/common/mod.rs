#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reel_core::pagination::PaginationPolicy;
use reel_core::roles::{ROLE_ADMIN, ROLE_USER};
use reel_core::types::DbId;
use reel_db::models::user::CreateUser;
use reel_db::Store;
use tower::ServiceExt;

use reel_api::auth::jwt::{generate_access_token, JwtConfig};
use reel_api::config::ServerConfig;
use reel_api::router::build_app_router;
use reel_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        pagination: PaginationPolicy::default(),
        admin: None,
    }
}

/// Build the full application router over `store`, with all middleware
/// layers, exactly as `main.rs` does.
///
/// Pass clones of one store to share data between requests.
pub fn build_test_app(store: Store) -> Router {
    build_test_app_with(store, test_config())
}

pub fn build_test_app_with(store: Store, config: ServerConfig) -> Router {
    build_app_router(AppState {
        store,
        config: Arc::new(config),
    })
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Insert a user directly into the store and mint a token for it.
///
/// The stored hash is not a real password hash; use the `/auth` endpoints
/// for tests that need to log in.
pub async fn create_user_with_role(store: &Store, username: &str, role: &str) -> (DbId, String) {
    let user = store
        .users
        .create(&CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "unused".to_string(),
            role: role.to_string(),
        })
        .await
        .expect("user creation should succeed");

    let config = test_config();
    let token = generate_access_token(user.id, &user.role, &config.jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

pub async fn create_user(store: &Store, username: &str) -> (DbId, String) {
    create_user_with_role(store, username, ROLE_USER).await
}

pub async fn create_admin(store: &Store, username: &str) -> (DbId, String) {
    create_user_with_role(store, username, ROLE_ADMIN).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, None, Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a raw body with a JSON content type, for malformed-payload tests.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a create request and return the created entity's id.
pub async fn create_entity(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> DbId {
    let response = post_json_auth(app, uri, body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
