use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reel_core::error::CoreError;
use reel_core::validation::{FieldErrors, REQUIRED_MESSAGE};
use reel_db::StoreError;
use serde::Serialize;

/// Error returned by every handler and extractor.
///
/// Renders as:
///
/// ```text
/// { "error": "...", "code": "VALIDATION_ERROR", "fields": { "name": ["..."] } }
/// ```
///
/// `fields` is only present for validation errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx that the store could not classify.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request (unparseable body or query string).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A URL that names no resource, such as a non-integer id segment.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Integrity failures surface as field errors on the offending payload key,
/// except a restricted delete, which is a conflict.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingField(field) => {
                CoreError::Validation(FieldErrors::single(field, REQUIRED_MESSAGE)).into()
            }
            StoreError::MissingReference { field, entity } => CoreError::Validation(
                FieldErrors::single(field, format!("Referenced {entity} does not exist.")),
            )
            .into(),
            StoreError::Duplicate { entity, field } => CoreError::Validation(FieldErrors::single(
                field,
                format!("{entity} with this {field} already exists."),
            ))
            .into(),
            err @ StoreError::InUse { .. } => CoreError::Conflict(err.to_string()).into(),
            StoreError::Database(db) => AppError::Database(db),
        }
    }
}

/// Wire shape of every error response.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl AppError {
    /// Status, machine-readable code and client-facing message.
    ///
    /// Internal details are logged here and never sent to the client.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::InvalidPage { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Invalid page.".to_string())
            }
            AppError::Core(CoreError::Validation(_)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
            ),
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        let fields = match &self {
            AppError::Core(CoreError::Validation(fields)) => Some(fields),
            _ => None,
        };
        let body = ErrorBody {
            error,
            code,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

/// Map a sqlx error the store left unclassified.
///
/// Unique violations on a `uq_` constraint are 409; anything else is logged
/// and reported as a bare 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    internal()
}
