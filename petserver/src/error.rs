//! Pet server error types

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use shared::{Component, SharedError, service_error, service_warn};
use thiserror::Error;

/// Per-field validation messages, keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum PetServerError {
    #[error("Invalid input: {}", summarize(.errors))]
    Validation { errors: FieldErrors },

    #[error("Malformed request body: {details}")]
    MalformedBody { details: String },

    #[error("Malformed query string: {details}")]
    MalformedQuery { details: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Invalid page: {page}")]
    InvalidPage { page: String },

    #[error("Store operation failed: {message}")]
    Store { message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PetServerError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        PetServerError::NotFound { resource: resource.into() }
    }

    pub fn store(message: impl Into<String>) -> Self {
        PetServerError::Store { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PetServerError::Validation { .. }
            | PetServerError::MalformedBody { .. }
            | PetServerError::MalformedQuery { .. } => StatusCode::BAD_REQUEST,
            PetServerError::NotFound { .. } | PetServerError::InvalidPage { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for PetServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            PetServerError::Validation { errors } => json!({
                "detail": "Invalid input.",
                "errors": errors,
            }),
            PetServerError::MalformedBody { details } | PetServerError::MalformedQuery { details } => {
                json!({ "detail": details })
            }
            PetServerError::NotFound { .. } => json!({ "detail": "Not found." }),
            PetServerError::InvalidPage { .. } => json!({ "detail": "Invalid page." }),
            other => json!({ "detail": other.to_string() }),
        };

        if status.is_server_error() {
            service_error!(Component::Api, error = %self, "Request failed with {}", status);
        } else {
            service_warn!(Component::Api, error = %self, "Request rejected with {}", status);
        }

        (status, Json(body)).into_response()
    }
}

pub type PetServerResult<T> = Result<T, PetServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let validation = PetServerError::Validation { errors: FieldErrors::new() };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PetServerError::MalformedQuery { details: "duplicate field `page`".to_string() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(PetServerError::not_found("Pet 3").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            PetServerError::InvalidPage { page: "9".to_string() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(PetServerError::store("lock poisoned").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("age".to_string(), vec!["This field is required.".to_string()]);
        errors.insert("name".to_string(), vec!["This field may not be blank.".to_string()]);
        let message = PetServerError::Validation { errors }.to_string();
        assert!(message.contains("age: This field is required."));
        assert!(message.contains("name: This field may not be blank."));
    }
}
