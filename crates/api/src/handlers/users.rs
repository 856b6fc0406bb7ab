//! Handlers for the `/users` directory.

use axum::extract::State;
use axum::Json;
use reel_core::pagination::Page;
use reel_core::permission::{Operation, ResourcePolicy};
use reel_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::extract::QueryParams;
use crate::middleware::auth::RequestIdentity;
use crate::query::PaginationParams;
use crate::state::AppState;

/// GET /api/users?limit=&offset=
///
/// Public listing of accounts. Emails and password hashes are never exposed.
pub async fn list(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    ResourcePolicy::USER_DIRECTORY.authorize(Operation::List, &requester, None)?;

    let count = state.store.users.count().await?;
    let window = state
        .config
        .pagination
        .resolve(count, params.limit, params.offset)?;
    let users = state.store.users.list(window.limit, window.skip()).await?;

    Ok(Json(Page::new(window, users).map(UserResponse::from)))
}
