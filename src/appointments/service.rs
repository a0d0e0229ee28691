use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::appointments::{
    Appointment, AppointmentError, AppointmentRepository, AppointmentStatus,
    CreateAppointmentRequest, DoctorResolver, NewAppointment,
};

/// Service for appointment business logic
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    resolver: DoctorResolver,
}

impl AppointmentService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, resolver: DoctorResolver) -> Self {
        Self {
            appointments,
            resolver,
        }
    }

    /// Book an appointment for the authenticated patient
    ///
    /// # Validation
    /// - Every booking field must be present and well-formed
    /// - The doctor name and department must match exactly one doctor
    /// - The booking starts as Pending; doctor and patient ids never change afterwards
    pub async fn create_appointment(
        &self,
        patient_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        request.validate()?;
        let booking = into_booking(request)?;

        let doctor_id = self
            .resolver
            .resolve(
                &booking.doctor_first_name,
                &booking.doctor_last_name,
                &booking.department,
            )
            .await?;

        let appointment = self
            .appointments
            .create(NewAppointment {
                doctor_id,
                patient_id,
                ..booking
            })
            .await?;

        tracing::info!(
            "Appointment {} booked by patient {} with doctor {}",
            appointment.id,
            patient_id,
            doctor_id
        );
        Ok(appointment)
    }

    /// Every appointment, newest first
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.list_all().await?;
        tracing::debug!("Retrieved {} appointments", appointments.len());
        Ok(appointments)
    }

    /// Set an appointment's status and return the updated record
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let updated = self
            .appointments
            .update_status(appointment_id, status)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        tracing::info!("Appointment {} status set to {}", appointment_id, status);
        Ok(updated)
    }

    /// Permanently delete an appointment
    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        if !self.appointments.delete(appointment_id).await? {
            tracing::debug!("Appointment {} not found for deletion", appointment_id);
            return Err(AppointmentError::NotFound);
        }

        tracing::info!("Deleted appointment {}", appointment_id);
        Ok(())
    }
}

/// Turn a validated form into a booking; doctor and patient ids are filled in later
fn into_booking(request: CreateAppointmentRequest) -> Result<NewAppointment, AppointmentError> {
    // validate() guarantees presence; a None here means the form skipped validation
    fn present<T>(value: Option<T>) -> Result<T, AppointmentError> {
        value.ok_or_else(|| AppointmentError::Validation(validator::ValidationErrors::new()))
    }

    let gender = present(request.gender)?
        .parse()
        .map_err(|_| AppointmentError::Validation(validator::ValidationErrors::new()))?;

    Ok(NewAppointment {
        first_name: present(request.first_name)?,
        last_name: present(request.last_name)?,
        email: present(request.email)?,
        phone: present(request.phone)?,
        national_identity_number: present(request.national_identity_number)?,
        dob: present(request.dob)?,
        gender,
        appointment_date: present(request.appointment_date)?,
        department: present(request.department)?,
        doctor_first_name: present(request.doctor_first_name)?,
        doctor_last_name: present(request.doctor_last_name)?,
        has_visited: request.has_visited,
        address: present(request.address)?,
        doctor_id: Uuid::nil(),
        patient_id: Uuid::nil(),
    })
}
