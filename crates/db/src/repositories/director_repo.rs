//! Repository for the `directors` table.

use async_trait::async_trait;
use reel_core::types::DbId;

use super::{classify_write_error, is_foreign_key_violation, PgStore};
use crate::error::{required, StoreError, StoreResult};
use crate::models::assigned;
use crate::models::director::{Director, DirectorPayload};
use crate::store::Repository;

const COLUMNS: &str = "id, name, biography, birth_year, created_by, created_at, updated_at";

#[async_trait]
impl Repository<Director> for PgStore {
    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM directors")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Director>> {
        let query = format!("SELECT {COLUMNS} FROM directors ORDER BY id LIMIT $1 OFFSET $2");
        let directors = sqlx::query_as::<_, Director>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await?;
        Ok(directors)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Director>> {
        let query = format!("SELECT {COLUMNS} FROM directors WHERE id = $1");
        let director = sqlx::query_as::<_, Director>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(director)
    }

    async fn create(
        &self,
        input: &DirectorPayload,
        created_by: Option<DbId>,
    ) -> StoreResult<Director> {
        let name = required(&input.name, "name")?;
        let query = format!(
            "INSERT INTO directors (name, biography, birth_year, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Director>(&query)
            .bind(name)
            .bind(assigned(&input.biography))
            .bind(assigned(&input.birth_year))
            .bind(created_by)
            .fetch_one(self.pool())
            .await
            .map_err(classify_write_error)
    }

    async fn update(&self, id: DbId, input: &DirectorPayload) -> StoreResult<Option<Director>> {
        let query = format!(
            "UPDATE directors SET
                name = COALESCE($2, name),
                biography = CASE WHEN $3 THEN $4::TEXT ELSE biography END,
                birth_year = CASE WHEN $5 THEN $6::INTEGER ELSE birth_year END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Director>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.biography.is_some())
            .bind(assigned(&input.biography))
            .bind(input.birth_year.is_some())
            .bind(assigned(&input.birth_year))
            .fetch_optional(self.pool())
            .await
            .map_err(classify_write_error)
    }

    /// Fails with [`StoreError::InUse`] while any movie references the director.
    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM directors WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await;
        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(err) if is_foreign_key_violation(&err) => Err(StoreError::InUse {
                entity: "Director",
                id,
                referenced_by: "movies",
            }),
            Err(err) => Err(err.into()),
        }
    }
}
