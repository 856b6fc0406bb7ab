//! Domain logic shared by the store and the HTTP layer.
//!
//! Everything in this crate is pure: no database, no HTTP. The pagination
//! and permission policies are plain values consumed by the handlers.

pub mod error;
pub mod pagination;
pub mod permission;
pub mod roles;
pub mod types;
pub mod validation;
