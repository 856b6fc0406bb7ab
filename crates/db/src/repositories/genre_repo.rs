//! Repository for the `genres` table.

use async_trait::async_trait;
use reel_core::types::DbId;

use super::{classify_write_error, PgStore};
use crate::error::{required, StoreResult};
use crate::models::assigned;
use crate::models::genre::{Genre, GenrePayload};
use crate::store::Repository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

#[async_trait]
impl Repository<Genre> for PgStore {
    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Genre>> {
        let query = format!("SELECT {COLUMNS} FROM genres ORDER BY id LIMIT $1 OFFSET $2");
        let genres = sqlx::query_as::<_, Genre>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await?;
        Ok(genres)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Genre>> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(genre)
    }

    async fn create(&self, input: &GenrePayload, created_by: Option<DbId>) -> StoreResult<Genre> {
        let name = required(&input.name, "name")?;
        let query = format!(
            "INSERT INTO genres (name, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .bind(assigned(&input.description))
            .bind(created_by)
            .fetch_one(self.pool())
            .await
            .map_err(classify_write_error)
    }

    async fn update(&self, id: DbId, input: &GenrePayload) -> StoreResult<Option<Genre>> {
        let query = format!(
            "UPDATE genres SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4::TEXT ELSE description END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(assigned(&input.description))
            .fetch_optional(self.pool())
            .await
            .map_err(classify_write_error)
    }

    /// Join rows in `movie_genres` are removed by `ON DELETE CASCADE`.
    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
