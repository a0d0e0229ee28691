use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::appointments::{
    error::AppointmentError,
    models::{Appointment, AppointmentStatus, NewAppointment},
};

const APPOINTMENT_COLUMNS: &str = "id, first_name, last_name, email, phone, \
     national_identity_number, dob, gender, appointment_date, department, doctor_first_name, \
     doctor_last_name, has_visited, address, doctor_id, patient_id, status, created_at, updated_at";

/// Persistence operations on appointments
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a booking with status Pending
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError>;

    /// Every appointment, newest first
    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError>;

    /// Set the status; `None` when no appointment has this id
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentError>;

    /// Remove the appointment; `false` when no appointment has this id
    async fn delete(&self, id: Uuid) -> Result<bool, AppointmentError>;
}

/// Postgres-backed appointment repository
#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let query = format!(
            r#"
            INSERT INTO appointments (id, first_name, last_name, email, phone,
                                      national_identity_number, dob, gender, appointment_date,
                                      department, doctor_first_name, doctor_last_name,
                                      has_visited, address, doctor_id, patient_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );

        let created = sqlx::query_as::<_, Appointment>(&query)
            .bind(Uuid::new_v4())
            .bind(&appointment.first_name)
            .bind(&appointment.last_name)
            .bind(&appointment.email)
            .bind(&appointment.phone)
            .bind(&appointment.national_identity_number)
            .bind(appointment.dob)
            .bind(appointment.gender)
            .bind(appointment.appointment_date)
            .bind(&appointment.department)
            .bind(&appointment.doctor_first_name)
            .bind(&appointment.doctor_last_name)
            .bind(appointment.has_visited)
            .bind(&appointment.address)
            .bind(appointment.doctor_id)
            .bind(appointment.patient_id)
            .bind(AppointmentStatus::Pending)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let query = format!(
            "SELECT {} FROM appointments ORDER BY created_at DESC",
            APPOINTMENT_COLUMNS
        );
        let appointments = sqlx::query_as::<_, Appointment>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(appointments)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!(
            r#"
            UPDATE appointments
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(appointment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppointmentError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
