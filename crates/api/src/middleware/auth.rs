//! Who is calling: bearer-token extractors for handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reel_core::error::CoreError;
use reel_core::permission::Requester;
use reel_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// A caller holding a valid access token for an enabled account.
///
/// Rejects with 401 unless the `Authorization` header holds a bearer token
/// that validates and names an existing user. A disabled account is 403.
/// The role comes from the stored account, not the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl From<AuthUser> for Requester {
    fn from(user: AuthUser) -> Self {
        Requester::User {
            id: user.user_id,
            role: user.role,
        }
    }
}

fn unauthorized(reason: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(reason.to_string()))
}

/// The token part of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = validate_token(bearer_token(parts)?, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = state
            .store
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;
        if !user.is_active {
            tracing::warn!(user_id = user.id, "Token presented for disabled account");
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}

/// The requester as seen by the permission policy.
///
/// No `Authorization` header yields [`Requester::Anonymous`]. A header that
/// is present but does not carry a valid token is rejected with 401 rather
/// than silently downgraded to anonymous.
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Requester);

impl FromRequestParts<AppState> for RequestIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(RequestIdentity(Requester::Anonymous));
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequestIdentity(user.into()))
    }
}
