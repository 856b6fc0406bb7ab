use std::sync::Arc;

use reel_db::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the store is a bundle of `Arc`s and the config is shared.
#[derive(Clone)]
pub struct AppState {
    /// Repositories for every entity type.
    pub store: Store,
    /// Server configuration (JWT settings, pagination policy).
    pub config: Arc<ServerConfig>,
}
