//! Route definitions for the catalog resources (`/genres`, `/directors`,
//! `/movies`).

use axum::routing::get;
use axum::Router;

use crate::handlers::resource::{self, Resource};
use crate::state::AppState;

/// CRUD routes for one catalog resource mounted at `base`.
///
/// ```text
/// GET    {base}, {base}/  -> list
/// POST   {base}, {base}/  -> create
/// GET    {base}/{id}      -> retrieve
/// PUT    {base}/{id}      -> replace
/// PATCH  {base}/{id}      -> patch
/// DELETE {base}/{id}      -> delete
/// ```
pub fn router<R: Resource>(base: &str) -> Router<AppState> {
    let collection = get(resource::list::<R>).post(resource::create::<R>);

    Router::new()
        .route(base, collection.clone())
        .route(&format!("{base}/"), collection)
        .route(
            &format!("{base}/{{id}}"),
            get(resource::retrieve::<R>)
                .put(resource::replace::<R>)
                .patch(resource::patch::<R>)
                .delete(resource::delete::<R>),
        )
}
