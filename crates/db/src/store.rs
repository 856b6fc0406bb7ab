//! The repository interface the HTTP layer is written against.
//!
//! Handlers never see a connection pool. They receive a [`Store`], pick the
//! repository for their entity type through [`Entity::repository`], and call
//! the uniform [`Repository`] operations on it.

use std::sync::Arc;

use async_trait::async_trait;
use reel_core::types::DbId;
use reel_core::validation::Payload;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreResult;
use crate::memory::MemoryStore;
use crate::models::director::Director;
use crate::models::genre::Genre;
use crate::models::movie::Movie;
use crate::models::user::{CreateUser, User};
use crate::repositories::PgStore;
use crate::DbPool;

/// A catalog entity served through the generic CRUD handlers.
pub trait Entity: Serialize + Clone + Send + Sync + 'static {
    /// Display name used in not-found errors and log lines.
    const NAME: &'static str;

    /// Payload accepted by create, full update and partial update.
    type Payload: Payload + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> DbId;

    /// The user who created this entity, if recorded.
    fn owner_id(&self) -> Option<DbId>;

    /// The repository holding this entity type.
    fn repository(store: &Store) -> &dyn Repository<Self>;
}

/// CRUD operations over one entity type, ordered by id ascending.
///
/// Payloads are expected to be validated already; a required field that is
/// still unset fails with `StoreError::MissingField`.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn count(&self) -> StoreResult<i64>;

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<E>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<E>>;

    async fn create(&self, input: &E::Payload, created_by: Option<DbId>) -> StoreResult<E>;

    /// Apply the supplied fields; unset fields keep their stored value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn update(&self, id: DbId, input: &E::Payload) -> StoreResult<Option<E>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

/// Account storage used by the auth endpoints and the user listing.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> StoreResult<i64>;

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn create(&self, input: &CreateUser) -> StoreResult<User>;

    /// Enable or disable an account. Returns `false` if no such user exists.
    async fn set_active(&self, id: DbId, active: bool) -> StoreResult<bool>;
}

/// Reachability check for the health endpoint.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// One repository per entity type, all backed by the same backend.
///
/// Cheap to clone; every field is an `Arc`.
#[derive(Clone)]
pub struct Store {
    pub genres: Arc<dyn Repository<Genre>>,
    pub directors: Arc<dyn Repository<Director>>,
    pub movies: Arc<dyn Repository<Movie>>,
    pub users: Arc<dyn UserRepository>,
    health: Arc<dyn HealthCheck>,
}

impl Store {
    /// Store backed by PostgreSQL.
    pub fn postgres(pool: DbPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    /// Store held entirely in process memory. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: Repository<Genre>
            + Repository<Director>
            + Repository<Movie>
            + UserRepository
            + HealthCheck
            + 'static,
    {
        Self {
            genres: backend.clone(),
            directors: backend.clone(),
            movies: backend.clone(),
            users: backend.clone(),
            health: backend,
        }
    }

    pub async fn health_check(&self) -> StoreResult<()> {
        self.health.ping().await
    }
}
