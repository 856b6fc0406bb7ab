//! Movie catalog API server library.
//!
//! Exposes config, state, error handling, extractors and routes so the
//! integration tests and the binary entrypoint can both build the app.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
