//! Startup tasks that seed the store.

use reel_core::roles::ROLE_ADMIN;
use reel_db::models::user::CreateUser;
use reel_db::Store;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless the username is already taken.
///
/// Returns `true` if an account was created. An existing account keeps its
/// role and password, but is re-enabled if it was disabled.
pub async fn ensure_admin(store: &Store, admin: &AdminBootstrap) -> AppResult<bool> {
    if let Some(existing) = store.users.find_by_username(&admin.username).await? {
        if !existing.is_active {
            store.users.set_active(existing.id, true).await?;
            tracing::warn!(user_id = existing.id, "Re-enabled disabled admin account");
        } else {
            tracing::debug!(username = %admin.username, "Admin account already exists");
        }
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = store
        .users
        .create(&CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin account created");
    Ok(true)
}
