use std::sync::Arc;

use uuid::Uuid;

use crate::appointments::error::AppointmentError;
use crate::auth::{models::Role, repository::UserRepository};

/// Maps the doctor name and department typed by a patient onto one doctor
///
/// Matching is exact and case-sensitive. Duplicate names are tolerated at
/// registration time, so ambiguity is detected here and reported.
#[derive(Clone)]
pub struct DoctorResolver {
    users: Arc<dyn UserRepository>,
}

impl DoctorResolver {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn resolve(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
    ) -> Result<Uuid, AppointmentError> {
        let matches = self
            .users
            .find_by_role_and_name(first_name, last_name, Role::Doctor, Some(department))
            .await?;

        match matches.as_slice() {
            [] => {
                tracing::debug!(
                    "No doctor named {} {} in {}",
                    first_name,
                    last_name,
                    department
                );
                Err(AppointmentError::DoctorNotFound)
            }
            [doctor] => Ok(doctor.id),
            _ => Err(AppointmentError::AmbiguousDoctor {
                matches: matches.len(),
            }),
        }
    }
}
