use reel_core::types::DbId;

/// Errors raised by a store backend.
///
/// Integrity violations are typed so the HTTP layer can report them as
/// field errors or conflicts; anything else is an opaque database failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required payload field reached the store unset.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A foreign key in the payload points at a row that does not exist.
    #[error("{field} references a {entity} that does not exist")]
    MissingReference {
        field: &'static str,
        entity: &'static str,
    },

    /// A unique column already holds the submitted value.
    #[error("{entity} with this {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    /// The row is still referenced and the delete is restricted.
    #[error("{entity} with id {id} is still referenced by {referenced_by}")]
    InUse {
        entity: &'static str,
        id: DbId,
        referenced_by: &'static str,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Borrow a required payload field, or fail with [`StoreError::MissingField`].
pub(crate) fn required<'a, T>(value: &'a Option<T>, field: &'static str) -> StoreResult<&'a T> {
    value.as_ref().ok_or(StoreError::MissingField(field))
}
