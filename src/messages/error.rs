use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Error types for contact message operations
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),
}

impl From<sqlx::Error> for MessageError {
    fn from(err: sqlx::Error) -> Self {
        MessageError::DatabaseError(err.to_string())
    }
}

impl From<MessageError> for ApiError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::DatabaseError(message) => ApiError::InternalError(message),
            MessageError::Validation(errors) => ApiError::ValidationError(errors),
        }
    }
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
