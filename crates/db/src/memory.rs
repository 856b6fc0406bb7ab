//! In-memory store backend.
//!
//! Holds every table in ordered maps behind a single `RwLock`, and enforces
//! the same integrity rules as the PostgreSQL schema:
//!
//! - genre names and usernames are unique
//! - a movie's director and genres must exist
//! - deleting a referenced director is refused
//! - deleting a genre drops it from every movie

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reel_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::{required, StoreError, StoreResult};
use crate::models::director::{Director, DirectorPayload};
use crate::models::genre::{Genre, GenrePayload};
use crate::models::movie::{Movie, MoviePayload};
use crate::models::user::{CreateUser, User};
use crate::store::{HealthCheck, Repository, UserRepository};

/// Rows of one table keyed by id, plus its id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<DbId, T>,
    last_id: DbId,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn page(&self, limit: i64, offset: i64) -> Vec<T> {
        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        self.rows.values().skip(skip).take(take).cloned().collect()
    }

    fn count(&self) -> i64 {
        i64::try_from(self.rows.len()).unwrap_or(i64::MAX)
    }
}

#[derive(Debug)]
struct Tables {
    users: Table<User>,
    genres: Table<Genre>,
    directors: Table<Director>,
    movies: Table<Movie>,
}

impl Tables {
    fn genre_name_taken(&self, name: &str, except: Option<DbId>) -> bool {
        self.genres
            .rows
            .values()
            .any(|g| g.name == name && Some(g.id) != except)
    }

    fn check_movie_references(
        &self,
        director_id: Option<DbId>,
        genre_ids: Option<&[DbId]>,
    ) -> StoreResult<()> {
        if let Some(director_id) = director_id {
            if !self.directors.rows.contains_key(&director_id) {
                return Err(StoreError::MissingReference {
                    field: "director_id",
                    entity: "Director",
                });
            }
        }
        if let Some(genre_ids) = genre_ids {
            if genre_ids.iter().any(|id| !self.genres.rows.contains_key(id)) {
                return Err(StoreError::MissingReference {
                    field: "genre_ids",
                    entity: "Genre",
                });
            }
        }
        Ok(())
    }
}

/// Store backend kept entirely in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: Table::new(),
                genres: Table::new(),
                directors: Table::new(),
                movies: Table::new(),
            }),
        }
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

#[async_trait]
impl Repository<Genre> for MemoryStore {
    async fn count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.genres.count())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Genre>> {
        Ok(self.tables.read().await.genres.page(limit, offset))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Genre>> {
        Ok(self.tables.read().await.genres.rows.get(&id).cloned())
    }

    async fn create(&self, input: &GenrePayload, created_by: Option<DbId>) -> StoreResult<Genre> {
        let name = required(&input.name, "name")?;
        let mut tables = self.tables.write().await;

        if tables.genre_name_taken(name, None) {
            return Err(StoreError::Duplicate {
                entity: "Genre",
                field: "name",
            });
        }

        let now = Utc::now();
        let genre = Genre {
            id: tables.genres.next_id(),
            name: name.clone(),
            description: input.description.clone().flatten(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        tables.genres.rows.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update(&self, id: DbId, input: &GenrePayload) -> StoreResult<Option<Genre>> {
        let mut tables = self.tables.write().await;

        if let Some(name) = &input.name {
            if tables.genre_name_taken(name, Some(id)) {
                return Err(StoreError::Duplicate {
                    entity: "Genre",
                    field: "name",
                });
            }
        }

        let Some(genre) = tables.genres.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            genre.name = name.clone();
        }
        if let Some(description) = &input.description {
            genre.description = description.clone();
        }
        genre.updated_at = Utc::now();
        Ok(Some(genre.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.genres.rows.remove(&id).is_none() {
            return Ok(false);
        }
        for movie in tables.movies.rows.values_mut() {
            movie.genre_ids.retain(|genre_id| *genre_id != id);
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Directors
// ---------------------------------------------------------------------------

#[async_trait]
impl Repository<Director> for MemoryStore {
    async fn count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.directors.count())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Director>> {
        Ok(self.tables.read().await.directors.page(limit, offset))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Director>> {
        Ok(self.tables.read().await.directors.rows.get(&id).cloned())
    }

    async fn create(
        &self,
        input: &DirectorPayload,
        created_by: Option<DbId>,
    ) -> StoreResult<Director> {
        let name = required(&input.name, "name")?;
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let director = Director {
            id: tables.directors.next_id(),
            name: name.clone(),
            biography: input.biography.clone().flatten(),
            birth_year: input.birth_year.flatten(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        tables.directors.rows.insert(director.id, director.clone());
        Ok(director)
    }

    async fn update(&self, id: DbId, input: &DirectorPayload) -> StoreResult<Option<Director>> {
        let mut tables = self.tables.write().await;
        let Some(director) = tables.directors.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            director.name = name.clone();
        }
        if let Some(biography) = &input.biography {
            director.biography = biography.clone();
        }
        if let Some(birth_year) = input.birth_year {
            director.birth_year = birth_year;
        }
        director.updated_at = Utc::now();
        Ok(Some(director.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.directors.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.movies.rows.values().any(|m| m.director_id == id) {
            return Err(StoreError::InUse {
                entity: "Director",
                id,
                referenced_by: "movies",
            });
        }
        tables.directors.rows.remove(&id);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[async_trait]
impl Repository<Movie> for MemoryStore {
    async fn count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.movies.count())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Movie>> {
        Ok(self.tables.read().await.movies.page(limit, offset))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Movie>> {
        Ok(self.tables.read().await.movies.rows.get(&id).cloned())
    }

    async fn create(&self, input: &MoviePayload, created_by: Option<DbId>) -> StoreResult<Movie> {
        let title = required(&input.title, "title")?;
        let director_id = *required(&input.director_id, "director_id")?;
        let genre_ids = input.normalized_genre_ids().unwrap_or_default();

        let mut tables = self.tables.write().await;
        tables.check_movie_references(Some(director_id), Some(&genre_ids))?;

        let now = Utc::now();
        let movie = Movie {
            id: tables.movies.next_id(),
            title: title.clone(),
            description: input.description.clone().flatten(),
            release_year: input.release_year.flatten(),
            duration_minutes: input.duration_minutes.flatten(),
            director_id,
            genre_ids,
            created_by,
            created_at: now,
            updated_at: now,
        };
        tables.movies.rows.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: DbId, input: &MoviePayload) -> StoreResult<Option<Movie>> {
        let genre_ids = input.normalized_genre_ids();

        let mut tables = self.tables.write().await;
        if !tables.movies.rows.contains_key(&id) {
            return Ok(None);
        }
        tables.check_movie_references(input.director_id, genre_ids.as_deref())?;

        let Some(movie) = tables.movies.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            movie.title = title.clone();
        }
        if let Some(description) = &input.description {
            movie.description = description.clone();
        }
        if let Some(release_year) = input.release_year {
            movie.release_year = release_year;
        }
        if let Some(duration_minutes) = input.duration_minutes {
            movie.duration_minutes = duration_minutes;
        }
        if let Some(director_id) = input.director_id {
            movie.director_id = director_id;
        }
        if let Some(genre_ids) = genre_ids {
            movie.genre_ids = genre_ids;
        }
        movie.updated_at = Utc::now();
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.movies.rows.remove(&id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.users.count())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.page(limit, offset))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .rows
            .values()
            .any(|u| u.username == input.username)
        {
            return Err(StoreError::Duplicate {
                entity: "User",
                field: "username",
            });
        }

        let user = User {
            id: tables.users.next_id(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_active(&self, id: DbId, active: bool) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.rows.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
