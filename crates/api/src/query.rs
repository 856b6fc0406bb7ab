//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Pagination parameters for list endpoints (`?limit=&offset=`).
///
/// `offset` is a 1-based page index, not a row offset. Both are resolved
/// against the configured [`reel_core::pagination::PaginationPolicy`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
