// Error handling module for the Hospital API
// Provides the crate-wide error type and its HTTP response conversion

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::validation::{first_error_message, without_values};

/// Main error type for the API
///
/// Every module error (auth, appointments, messages, avatars) converts into
/// this type, so all failures leave the service in the same JSON shape.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// A single request-level validation failure (e.g. mismatched passwords)
    /// Maps to HTTP 400 Bad Request
    BadRequest(String),

    /// Resource not found
    /// Maps to HTTP 404 Not Found
    NotFound(String),

    /// Duplicate email or ambiguous doctor match
    /// Maps to HTTP 400 Bad Request
    Conflict { message: String },

    /// Missing, invalid or expired credentials
    /// Maps to HTTP 400 Bad Request
    Unauthorized(String),

    /// Authenticated, but the role may not access the resource
    /// Maps to HTTP 403 Forbidden
    Forbidden(String),

    /// Database operation errors
    /// Maps to HTTP 500, details are never sent to the client
    DatabaseError(sqlx::Error),

    /// Failure reported by an external collaborator (avatar storage)
    /// Maps to HTTP 500 with the given client-safe message
    Upstream(String),

    /// Internal server errors
    /// Maps to HTTP 500, details are never sent to the client
    InternalError(String),
}

/// Consistent error response structure
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always false, mirrors the `success` flag of successful payloads
    pub success: bool,

    /// Machine-readable error code (e.g. "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors, omitted when None
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String) -> Self {
        Self {
            success: false,
            error_code: error_code.to_string(),
            message,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity:
    /// - error!: database, upstream and internal failures (500-level)
    /// - warn!: authentication, authorization and conflicts
    /// - debug!: expected client errors (validation, not found)
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                // Rejected inputs may be passwords; neither log nor echo them
                let errors = without_values(errors);
                debug!("Validation error: {:?}", errors);
                let mut response =
                    ErrorResponse::new("VALIDATION_ERROR", first_error_message(&errors));
                response.details =
                    Some(serde_json::to_value(&errors).unwrap_or(serde_json::json!({})));
                response
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new("BAD_REQUEST", message.clone())
            }
            ApiError::NotFound(message) => {
                debug!("Resource not found: {}", message);
                ErrorResponse::new("NOT_FOUND", message.clone())
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone())
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthenticated request: {}", message);
                ErrorResponse::new("UNAUTHENTICATED", message.clone())
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                ErrorResponse::new("FORBIDDEN", message.clone())
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred".to_string())
            }
            ApiError::Upstream(message) => {
                error!("Upstream failure: {}", message);
                ErrorResponse::new("UPSTREAM_ERROR", message.clone())
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };
        (status, response)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

// Undecodable bodies are client errors like any other validation failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::BadRequest(error.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
