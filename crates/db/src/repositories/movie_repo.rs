//! Repository for the `movies` table and its `movie_genres` join.
//!
//! Writes touch both tables, so create and update run in one transaction.

use async_trait::async_trait;
use reel_core::types::DbId;
use sqlx::{Postgres, Transaction};

use super::{classify_write_error, PgStore};
use crate::error::{required, StoreResult};
use crate::models::assigned;
use crate::models::movie::{Movie, MoviePayload};
use crate::store::Repository;

/// Movie columns plus the aggregated, ordered genre id array.
const SELECT: &str = "SELECT m.id, m.title, m.description, m.release_year, m.duration_minutes,
        m.director_id,
        ARRAY(SELECT mg.genre_id FROM movie_genres mg
              WHERE mg.movie_id = m.id ORDER BY mg.genre_id) AS genre_ids,
        m.created_by, m.created_at, m.updated_at
     FROM movies m";

/// Replace the genre set of `movie_id` with `genre_ids`.
async fn replace_genres(
    tx: &mut Transaction<'_, Postgres>,
    movie_id: DbId,
    genre_ids: &[DbId],
) -> StoreResult<()> {
    sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
        .bind(movie_id)
        .execute(&mut **tx)
        .await?;

    if !genre_ids.is_empty() {
        sqlx::query(
            "INSERT INTO movie_genres (movie_id, genre_id)
             SELECT $1::BIGINT, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await
        .map_err(classify_write_error)?;
    }
    Ok(())
}

async fn fetch_in_tx(tx: &mut Transaction<'_, Postgres>, id: DbId) -> StoreResult<Movie> {
    let query = format!("{SELECT} WHERE m.id = $1");
    let movie = sqlx::query_as::<_, Movie>(&query)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(movie)
}

#[async_trait]
impl Repository<Movie> for PgStore {
    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Movie>> {
        let query = format!("{SELECT} ORDER BY m.id LIMIT $1 OFFSET $2");
        let movies = sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await?;
        Ok(movies)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Movie>> {
        let query = format!("{SELECT} WHERE m.id = $1");
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(movie)
    }

    async fn create(&self, input: &MoviePayload, created_by: Option<DbId>) -> StoreResult<Movie> {
        let title = required(&input.title, "title")?;
        let director_id = *required(&input.director_id, "director_id")?;

        let mut tx = self.pool().begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO movies
                (title, description, release_year, duration_minutes, director_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(title)
        .bind(assigned(&input.description))
        .bind(assigned(&input.release_year))
        .bind(assigned(&input.duration_minutes))
        .bind(director_id)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify_write_error)?;

        if let Some(genre_ids) = input.normalized_genre_ids() {
            replace_genres(&mut tx, id, &genre_ids).await?;
        }

        let movie = fetch_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(movie)
    }

    async fn update(&self, id: DbId, input: &MoviePayload) -> StoreResult<Option<Movie>> {
        let mut tx = self.pool().begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE movies SET
                title = COALESCE($2, title),
                director_id = COALESCE($3, director_id),
                description = CASE WHEN $4 THEN $5::TEXT ELSE description END,
                release_year = CASE WHEN $6 THEN $7::INTEGER ELSE release_year END,
                duration_minutes = CASE WHEN $8 THEN $9::INTEGER ELSE duration_minutes END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(input.director_id)
        .bind(input.description.is_some())
        .bind(assigned(&input.description))
        .bind(input.release_year.is_some())
        .bind(assigned(&input.release_year))
        .bind(input.duration_minutes.is_some())
        .bind(assigned(&input.duration_minutes))
        .fetch_optional(&mut *tx)
        .await
        .map_err(classify_write_error)?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(genre_ids) = input.normalized_genre_ids() {
            replace_genres(&mut tx, id, &genre_ids).await?;
        }

        let movie = fetch_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Join rows in `movie_genres` are removed by `ON DELETE CASCADE`.
    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
