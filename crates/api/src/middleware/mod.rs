//! Request identity extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::RequestIdentity`] -- Anonymous or authenticated requester, for
//!   endpoints whose permission policy admits anonymous access.

pub mod auth;
