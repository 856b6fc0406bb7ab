//! Repository for the `users` table.

use async_trait::async_trait;
use reel_core::types::DbId;

use super::{classify_write_error, PgStore};
use crate::error::StoreResult;
use crate::models::user::{CreateUser, User};
use crate::store::UserRepository;

const COLUMNS: &str = "id, username, email, password_hash, role, is_active, created_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        let users = sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(self.pool())
            .await
            .map_err(classify_write_error)
    }

    async fn set_active(&self, id: DbId, active: bool) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
