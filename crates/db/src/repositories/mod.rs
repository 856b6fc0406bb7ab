//! PostgreSQL repository layer.
//!
//! [`PgStore`] implements every repository trait in [`crate::store`]; each
//! submodule holds the implementation for one table.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::store::HealthCheck;
use crate::DbPool;

pub mod director_repo;
pub mod genre_repo;
pub mod movie_repo;
pub mod user_repo;

/// PostgreSQL state code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL state code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Repository backend over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Classify an error raised by an insert or update.
///
/// Known constraint names (see the initial migration) become typed errors;
/// everything else stays an opaque [`StoreError::Database`].
pub(crate) fn classify_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code();
        match (code.as_deref(), db_err.constraint()) {
            (Some(UNIQUE_VIOLATION), Some("uq_genres_name")) => {
                return StoreError::Duplicate {
                    entity: "Genre",
                    field: "name",
                };
            }
            (Some(UNIQUE_VIOLATION), Some("uq_users_username")) => {
                return StoreError::Duplicate {
                    entity: "User",
                    field: "username",
                };
            }
            (Some(FOREIGN_KEY_VIOLATION), Some("fk_movies_director")) => {
                return StoreError::MissingReference {
                    field: "director_id",
                    entity: "Director",
                };
            }
            (Some(FOREIGN_KEY_VIOLATION), Some("fk_movie_genres_genre")) => {
                return StoreError::MissingReference {
                    field: "genre_ids",
                    entity: "Genre",
                };
            }
            (code, constraint) => {
                tracing::debug!(?code, ?constraint, "Unclassified database error on write");
            }
        }
    }
    StoreError::Database(err)
}

/// `true` if `err` is a foreign key violation, as raised by a restricted delete.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    )
}
