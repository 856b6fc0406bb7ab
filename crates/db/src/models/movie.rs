//! Movie entity model and payload.

use reel_core::types::{DbId, Timestamp};
use reel_core::validation::{Payload, Presence};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::store::{Entity, Repository, Store};

/// A movie row from the `movies` table, with its genre ids aggregated from
/// `movie_genres` in ascending order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub director_id: DbId,
    pub genre_ids: Vec<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Write payload for movies.
///
/// `title` and `director_id` are required on create and `PUT`. When
/// `genre_ids` is supplied it replaces the movie's genre set; when omitted
/// the set is left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MoviePayload {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1888, max = 2100))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub release_year: Option<Option<i32>>,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub duration_minutes: Option<Option<i32>>,
    pub director_id: Option<DbId>,
    #[validate(length(max = 20))]
    pub genre_ids: Option<Vec<DbId>>,
}

impl MoviePayload {
    /// Supplied genre ids, sorted and without duplicates.
    pub fn normalized_genre_ids(&self) -> Option<Vec<DbId>> {
        self.genre_ids.as_ref().map(|ids| {
            let mut ids = ids.clone();
            ids.sort_unstable();
            ids.dedup();
            ids
        })
    }
}

impl Payload for MoviePayload {
    fn required_fields(&self) -> Vec<(&'static str, Presence)> {
        vec![
            ("title", Presence::text(&self.title)),
            ("director_id", Presence::value(&self.director_id)),
        ]
    }
}

impl Entity for Movie {
    const NAME: &'static str = "Movie";
    type Payload = MoviePayload;

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        self.created_by
    }

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.movies.as_ref()
    }
}
