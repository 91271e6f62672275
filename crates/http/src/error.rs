//! Error taxonomy for the shelf HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

/// A single `(field, message)` validation violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error types that map to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client input violated one or more validation rules. Carries the
    /// ordered violation list; no write may have happened.
    #[error("validation failed: {} error(s)", errors.len())]
    Validation { errors: Vec<FieldError> },

    /// No record exists for the given identifier.
    #[error("{message}")]
    NotFound { message: String },

    /// Unexpected failure from the persistence layer during a mutation.
    /// `message` names the operation that failed; `detail` is the underlying
    /// error's own message string, and nothing more.
    #[error("{message}: {detail}")]
    Storage { message: String, detail: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error from an ordered violation list.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a storage failure for the named operation.
    pub fn storage(message: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: message.into(),
            detail: source.to_string(),
        }
    }
}

/// Summary line for a violation list: the first message, with a count of the
/// rest appended when there is more than one.
fn validation_summary(errors: &[FieldError]) -> String {
    let first = errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("The given data was invalid.");

    match errors.len() {
        0 | 1 => first.to_string(),
        2 => format!("{first} (and 1 more error)"),
        n => format!("{first} (and {} more errors)", n - 1),
    }
}

/// Group violations into a `{field: [messages]}` object, preserving the
/// per-field message order.
fn grouped_errors(errors: &[FieldError]) -> Value {
    let mut map = serde_json::Map::new();
    for error in errors {
        if let Some(list) = map
            .entry(error.field.clone())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
        {
            list.push(Value::String(error.message.clone()));
        }
    }
    Value::Object(map)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let (status, body) = match self {
            AppError::Validation { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "message": validation_summary(&errors),
                    "errors": grouped_errors(&errors),
                }),
            ),
            AppError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                json!({
                    "status": "error",
                    "message": message,
                }),
            ),
            AppError::Storage { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "status": "error",
                    "message": message,
                    "data": detail,
                }),
            ),
            AppError::Internal(e) => {
                // Hide internal detail outside debug builds.
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "status": "error",
                        "message": message,
                    }),
                )
            }
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            "request error"
        );

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_summary_counts_remaining_errors() {
        let errors = vec![
            FieldError::new("title", "The title field is required."),
            FieldError::new("author", "The author field is required."),
            FieldError::new("genre", "The selected genre is invalid."),
        ];
        assert_eq!(
            validation_summary(&errors),
            "The title field is required. (and 2 more errors)"
        );

        assert_eq!(
            validation_summary(&errors[..1]),
            "The title field is required."
        );
        assert_eq!(
            validation_summary(&errors[..2]),
            "The title field is required. (and 1 more error)"
        );
    }

    #[test]
    fn grouped_errors_collects_per_field_messages() {
        let errors = vec![
            FieldError::new("title", "The title field is required."),
            FieldError::new("title", "The title has already been taken."),
            FieldError::new("genre", "The selected genre is invalid."),
        ];

        let grouped = grouped_errors(&errors);
        assert_eq!(grouped["title"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            grouped["genre"][0],
            Value::String("The selected genre is invalid.".to_string())
        );
    }

    #[test]
    fn validation_error_maps_to_422() {
        let error = AppError::validation(vec![FieldError::new(
            "genre",
            "The selected genre is invalid.",
        )]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::not_found("Book not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let error = AppError::storage("Book not created", "store lock poisoned");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
