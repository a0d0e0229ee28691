use crate::auth::AuthError;
use crate::error::ApiError;

/// Error types for appointment operations
#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Appointment not found!")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctors Conflict! Please Contact Through Email Or Phone!")]
    AmbiguousDoctor { matches: usize },

    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Identity lookup failed: {0}")]
    Identity(#[from] AuthError),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(err: sqlx::Error) -> Self {
        AppointmentError::DatabaseError(err.to_string())
    }
}

impl From<AppointmentError> for ApiError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::DatabaseError(_) => ApiError::InternalError(message),
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => {
                ApiError::NotFound(message)
            }
            AppointmentError::AmbiguousDoctor { matches } => {
                tracing::warn!("Doctor lookup matched {} identities", matches);
                ApiError::Conflict { message }
            }
            AppointmentError::Validation(errors) => ApiError::ValidationError(errors),
            AppointmentError::Identity(auth) => ApiError::from(auth),
        }
    }
}
