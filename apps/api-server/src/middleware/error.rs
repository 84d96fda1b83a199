//! Error handling middleware - uniform `{"message", "errors"}` responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::ports::AuthError;
use blog_core::{DomainError, FieldErrors, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as the uniform error payload.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Request body could not be read at all.
    Unprocessable(String),
    Unauthorized,
    Conflict(String),
    Internal(String),
    Validation(FieldErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(message)
            | AppError::Unprocessable(message)
            | AppError::Conflict(message) => ErrorResponse::new(message.clone()),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone().into_inner()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                tracing::debug!(entity_type, id, "Resource not found");
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth => AppError::Unauthorized,
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

/// Flatten `validator` output into per-field messages.
pub fn field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, failures) in errors.field_errors() {
        for failure in failures {
            let message = match &failure.message {
                Some(message) => message.to_string(),
                None => format!("The {} field is invalid.", field.replace('_', " ")),
            };
            fields.add(field.to_string(), message);
        }
    }
    fields
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
