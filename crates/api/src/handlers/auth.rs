//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reel_core::error::CoreError;
use reel_core::roles::ROLE_USER;
use reel_core::validation::{validate_payload, Payload, Presence, WriteMode};
use reel_db::models::user::{CreateUser, UserResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

impl Payload for RegisterRequest {
    fn required_fields(&self) -> Vec<(&'static str, Presence)> {
        vec![
            ("username", Presence::text(&self.username)),
            ("email", Presence::text(&self.email)),
            ("password", Presence::text(&self.password)),
        ]
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a `user`-role account. Returns 201 with the public user.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_payload(&input, WriteMode::Full)?;

    let (Some(username), Some(email), Some(password)) =
        (input.username, input.email, input.password)
    else {
        return Err(AppError::InternalError(
            "Register payload passed validation with a missing field".into(),
        ));
    };

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .users
        .create(&CreateUser {
            username,
            email,
            password_hash,
            role: ROLE_USER.to_string(),
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login
///
/// Authenticate with username + password. Returns a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid_credentials =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = state
        .store
        .users
        .find_by_username(&input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(username = %input.username, "Failed login attempt");
        return Err(invalid_credentials());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: user.into(),
    }))
}
