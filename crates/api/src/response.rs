//! Shared response bodies for API handlers.
//!
//! List endpoints return [`reel_core::pagination::Page`]; detail endpoints
//! return the bare entity.

use serde::Serialize;

/// Acknowledgment returned by every delete endpoint: `{ "is_deleted": true }`.
#[derive(Debug, Serialize)]
pub struct DeleteAck {
    pub is_deleted: bool,
}

impl DeleteAck {
    pub fn deleted() -> Self {
        Self { is_deleted: true }
    }
}
