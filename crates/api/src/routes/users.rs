//! Route definitions for the `/users` directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes for the user directory mounted at `base`.
///
/// ```text
/// GET {base}, {base}/ -> list
/// ```
pub fn router(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(users::list))
        .route(&format!("{base}/"), get(users::list))
}
