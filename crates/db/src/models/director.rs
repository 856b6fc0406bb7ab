//! Director entity model and payload.

use reel_core::types::{DbId, Timestamp};
use reel_core::validation::{Payload, Presence};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::store::{Entity, Repository, Store};

/// A director row from the `directors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Director {
    pub id: DbId,
    pub name: String,
    pub biography: Option<String>,
    pub birth_year: Option<i32>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Write payload for directors. `name` is required on create and `PUT`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DirectorPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub biography: Option<Option<String>>,
    #[validate(range(min = 1800, max = 2100))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub birth_year: Option<Option<i32>>,
}

impl Payload for DirectorPayload {
    fn required_fields(&self) -> Vec<(&'static str, Presence)> {
        vec![("name", Presence::text(&self.name))]
    }
}

impl Entity for Director {
    const NAME: &'static str = "Director";
    type Payload = DirectorPayload;

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        self.created_by
    }

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.directors.as_ref()
    }
}
