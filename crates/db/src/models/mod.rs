//! Domain model structs and write payloads.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` payload with all-`Option` fields, shared by
//!   create, full update and partial update

pub mod director;
pub mod genre;
pub mod movie;
pub mod user;

/// A payload field backed by a nullable column, deserialized with
/// `serde_with::rust::double_option`.
///
/// `None` means the key was omitted and the stored value is kept.
/// `Some(None)` is an explicit JSON `null` and clears the column.
pub type Nullable<T> = Option<Option<T>>;

/// The value a [`Nullable`] field writes; `None` stores NULL.
pub(crate) fn assigned<T>(field: &Nullable<T>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}
