pub mod auth;
pub mod catalog;
pub mod health;
pub mod users;

use axum::Router;
use reel_db::models::director::Director;
use reel_db::models::genre::Genre;
use reel_db::models::movie::Movie;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
///
/// /genres, /genres/              list, create
/// /genres/{id}                   retrieve, replace, patch, delete
/// /directors, /directors/        list, create
/// /directors/{id}                retrieve, replace, patch, delete
/// /movies, /movies/              list, create
/// /movies/{id}                   retrieve, replace, patch, delete
///
/// /users, /users/                list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(catalog::router::<Genre>("/genres"))
        .merge(catalog::router::<Director>("/directors"))
        .merge(catalog::router::<Movie>("/movies"))
        .merge(users::router("/users"))
}
