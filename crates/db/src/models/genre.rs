//! Genre entity model and payload.

use reel_core::types::{DbId, Timestamp};
use reel_core::validation::{Payload, Presence};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::store::{Entity, Repository, Store};

/// A genre row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Write payload for genres. `name` is required on create and `PUT`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenrePayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl Payload for GenrePayload {
    fn required_fields(&self) -> Vec<(&'static str, Presence)> {
        vec![("name", Presence::text(&self.name))]
    }
}

impl Entity for Genre {
    const NAME: &'static str = "Genre";
    type Payload = GenrePayload;

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        self.created_by
    }

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.genres.as_ref()
    }
}
