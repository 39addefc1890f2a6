use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldMessage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Role not found: {0}")]
    RoleNotFound(i64),

    #[error("Validation failed on {} field(s)", .0.len())]
    FieldValidation(Vec<FieldMessage>),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("User {0} is still referenced by other records")]
    IntegrityViolation(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses.
///
/// A duplicate email is reported exactly like the advisory validator
/// reports it: a field-level violation, not a generic conflict.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail(_) => AppError::FieldValidation(vec![FieldMessage::new(
                "email",
                "email already exists",
            )]),
            UserError::RoleNotFound(id) => AppError::NotFound(format!("Role {} not found", id)),
            UserError::FieldValidation(violations) => AppError::FieldValidation(violations),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                AppError::InternalServerError("An internal error occurred".to_string())
            }
            UserError::IntegrityViolation(_) => {
                AppError::IntegrityConflict("Database integrity violation".to_string())
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
