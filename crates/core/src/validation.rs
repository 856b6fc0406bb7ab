//! Field-level validation of write payloads.
//!
//! Per-field constraints (length, range, email) are declared with
//! `#[derive(Validate)]` on the payload structs. Whether a field is required
//! depends on the write mode, so required-field checks live in the
//! [`Payload`] trait instead. Both sources are merged into one
//! [`FieldErrors`] map keyed by field name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Validation failures keyed by field name, each with one or more reasons.
///
/// Serializes as a plain JSON object: `{"name": ["This field is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a map holding exactly one failure.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reasons recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise a [`CoreError::Validation`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }

    fn merge_report(&mut self, report: &ValidationErrors) {
        for (field, failures) in report.field_errors() {
            for failure in failures.iter() {
                self.add(field.to_string(), describe(failure));
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Human-readable reason for a single `validator` failure.
fn describe(failure: &ValidationError) -> String {
    if let Some(message) = &failure.message {
        return message.to_string();
    }
    let param = |name: &str| failure.params.get(name).map(|v| v.to_string());
    match failure.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this field has {min} to {max} characters."),
            (Some(min), None) => format!("Ensure this field has at least {min} characters."),
            (None, Some(max)) => format!("Ensure this field has no more than {max} characters."),
            (None, None) => "Invalid length.".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this value is between {min} and {max}."),
            (Some(min), None) => format!("Ensure this value is greater than or equal to {min}."),
            (None, Some(max)) => format!("Ensure this value is less than or equal to {max}."),
            (None, None) => "Value out of range.".to_string(),
        },
        "email" => "Enter a valid email address.".to_string(),
        other => format!("Invalid value ({other})."),
    }
}

// ---------------------------------------------------------------------------
// Payload checks
// ---------------------------------------------------------------------------

/// How a payload is applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or `PUT`: every required field must be supplied.
    Full,
    /// `PATCH`: only the supplied fields are checked.
    Partial,
}

/// State of a required field in an incoming payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Missing,
    Blank,
    Present,
}

impl Presence {
    /// Presence of an optional text field; whitespace-only counts as blank.
    pub fn text(value: &Option<String>) -> Self {
        match value {
            None => Presence::Missing,
            Some(s) if s.trim().is_empty() => Presence::Blank,
            Some(_) => Presence::Present,
        }
    }

    /// Presence of any other optional field.
    pub fn value<T>(value: &Option<T>) -> Self {
        if value.is_some() {
            Presence::Present
        } else {
            Presence::Missing
        }
    }
}

/// A write payload whose fields are all `Option` so one type serves create,
/// full update and partial update.
pub trait Payload: Validate {
    /// Every required field paired with its presence in this payload.
    fn required_fields(&self) -> Vec<(&'static str, Presence)>;
}

/// Validate `payload` for the given write mode.
///
/// Missing required fields are reported only for [`WriteMode::Full`]; a
/// supplied-but-blank required field is reported in both modes.
pub fn validate_payload<P: Payload>(payload: &P, mode: WriteMode) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    for (field, presence) in payload.required_fields() {
        match presence {
            Presence::Missing if mode == WriteMode::Full => errors.add(field, REQUIRED_MESSAGE),
            Presence::Blank => errors.add(field, BLANK_MESSAGE),
            _ => {}
        }
    }

    if let Err(report) = payload.validate() {
        errors.merge_report(&report);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug, Validate)]
    struct SamplePayload {
        #[validate(length(min = 1, max = 10))]
        name: Option<String>,
        #[validate(range(min = 1800, max = 2100))]
        year: Option<i32>,
        parent_id: Option<i64>,
    }

    impl Payload for SamplePayload {
        fn required_fields(&self) -> Vec<(&'static str, Presence)> {
            vec![
                ("name", Presence::text(&self.name)),
                ("parent_id", Presence::value(&self.parent_id)),
            ]
        }
    }

    fn sample(name: Option<&str>, year: Option<i32>, parent_id: Option<i64>) -> SamplePayload {
        SamplePayload {
            name: name.map(str::to_string),
            year,
            parent_id,
        }
    }

    #[test]
    fn full_mode_reports_every_missing_required_field() {
        let err = validate_payload(&sample(None, None, None), WriteMode::Full).unwrap_err();
        assert_matches!(err, CoreError::Validation(fields) => {
            assert_eq!(fields.get("name"), Some(&[REQUIRED_MESSAGE.to_string()][..]));
            assert_eq!(fields.get("parent_id"), Some(&[REQUIRED_MESSAGE.to_string()][..]));
            assert_eq!(fields.fields().count(), 2);
        });
    }

    #[test]
    fn partial_mode_ignores_missing_fields() {
        assert!(validate_payload(&sample(None, Some(1999), None), WriteMode::Partial).is_ok());
    }

    #[test]
    fn blank_text_is_rejected_in_both_modes() {
        for mode in [WriteMode::Full, WriteMode::Partial] {
            let err = validate_payload(&sample(Some("   "), None, Some(1)), mode).unwrap_err();
            assert_matches!(err, CoreError::Validation(fields) => {
                assert_eq!(fields.get("name"), Some(&[BLANK_MESSAGE.to_string()][..]));
            });
        }
    }

    #[test]
    fn constraint_failures_are_keyed_by_field() {
        let err = validate_payload(
            &sample(Some("far too long a name"), Some(1500), Some(1)),
            WriteMode::Full,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(fields) => {
            let fields: Vec<_> = fields.fields().collect();
            assert_eq!(fields, vec!["name", "year"]);
        });
    }

    #[test]
    fn valid_payload_passes() {
        assert!(validate_payload(&sample(Some("Drama"), Some(1999), Some(3)), WriteMode::Full).is_ok());
    }

    #[test]
    fn field_errors_serialize_as_plain_map() {
        let mut errors = FieldErrors::single("title", REQUIRED_MESSAGE);
        errors.add("title", "second reason");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": ["This field is required.", "second reason"] })
        );
    }

    #[test]
    fn display_joins_all_reasons() {
        let mut errors = FieldErrors::single("b", "two");
        errors.add("a", "one");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }
}
