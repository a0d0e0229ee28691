// Authentication and authorization error types

use axum::response::{IntoResponse, Response};

use crate::auth::models::Role;
use crate::avatar::AvatarError;
use crate::error::ApiError;

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Registration errors
    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Password & Confirm Password Do Not Match!")]
    PasswordMismatch,

    #[error("{0}")]
    EmailAlreadyExists(String),

    #[error("Failed To Upload Doctor Avatar")]
    AvatarUpload(#[source] AvatarError),

    // Authentication errors
    #[error("Invalid Email Or Password!")]
    InvalidCredentials,

    #[error("User Not Found With This Role!")]
    RoleMismatch,

    /// Session cookie absent for a guarded route
    #[error("{0}")]
    MissingToken(&'static str),

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session token has expired")]
    ExpiredToken,

    /// Token verified but the identity it names no longer exists
    #[error("Session user no longer exists")]
    UnknownUser,

    // Authorization errors
    #[error("{actual} not authorized for this resource!")]
    Forbidden { required: Role, actual: Role },

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::Validation(errors) => ApiError::ValidationError(errors),
            AuthError::InvalidInput(_) | AuthError::PasswordMismatch => {
                ApiError::BadRequest(message)
            }
            AuthError::EmailAlreadyExists(_) => ApiError::Conflict { message },
            AuthError::AvatarUpload(source) => {
                tracing::error!("Avatar upload failed: {}", source);
                ApiError::Upstream(message)
            }
            AuthError::InvalidCredentials
            | AuthError::RoleMismatch
            | AuthError::MissingToken(_)
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownUser => ApiError::Unauthorized(message),
            AuthError::Forbidden { required, actual } => {
                tracing::warn!(
                    "Authorization failed: required role '{}', user has role '{}'",
                    required,
                    actual
                );
                ApiError::Forbidden(message)
            }
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_) => ApiError::InternalError(message),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
