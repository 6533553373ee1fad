//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::db::ServiceError;
use crate::models::FieldErrors;

pub const NOT_FOUND_MESSAGE: &str = "No Ticket matches the given query.";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Field-level validation failure
    Validation(FieldErrors),
    /// Resource not found
    NotFound(String),
    /// Malformed request
    BadRequest(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("VALIDATION_ERROR", "Invalid input.").with_fields(fields),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Repository(e) if e.is_not_found() => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", NOT_FOUND_MESSAGE),
            ),
            AppError::Repository(e) => {
                // Store details stay in the log.
                error!("Repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("REPOSITORY_ERROR", INTERNAL_MESSAGE),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => AppError::Validation(errors),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// Non-numeric ids cannot name a ticket.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketId;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                AppError::Validation(FieldErrors::single("title", "This field is required.")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Repository(RepositoryError::ticket_not_found("get_ticket", TicketId(3))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Repository(RepositoryError::connection("pool exhausted")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_service_error_conversion() {
        let err: AppError = ServiceError::Validation(FieldErrors::single("title", "x")).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
