use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::Gender;

/// Appointment status; any value may be set by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Accepted => "Accepted",
            AppointmentStatus::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(AppointmentStatus::Pending),
            "Accepted" => Ok(AppointmentStatus::Accepted),
            "Rejected" => Ok(AppointmentStatus::Rejected),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing an appointment in the database
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub appointment_date: NaiveDate,
    pub department: String,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub has_visited: bool,
    pub address: String,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated booking ready to be persisted
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub appointment_date: NaiveDate,
    pub department: String,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub has_visited: bool,
    pub address: String,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
}

/// Doctor name as typed by the patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorName {
    pub first_name: String,
    pub last_name: String,
}

/// Response DTO for an appointment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    #[serde(rename = "appointment_date")]
    pub appointment_date: NaiveDate,
    pub department: String,
    pub doctor_name: DoctorName,
    pub has_visited: bool,
    pub address: String,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            first_name: appointment.first_name,
            last_name: appointment.last_name,
            email: appointment.email,
            phone: appointment.phone,
            national_identity_number: appointment.national_identity_number,
            dob: appointment.dob,
            gender: appointment.gender,
            appointment_date: appointment.appointment_date,
            department: appointment.department,
            doctor_name: DoctorName {
                first_name: appointment.doctor_first_name,
                last_name: appointment.doctor_last_name,
            },
            has_visited: appointment.has_visited,
            address: appointment.address,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            status: appointment.status,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

/// Request DTO for booking an appointment
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[validate(
        required(message = "First Name Is Required!"),
        length(min = 2, message = "First Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last Name Is Required!"),
        length(min = 2, message = "Last Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email Is Required!"),
        email(message = "Please Provide A Valid Email!")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone Number Is Required!"),
        length(equal = 11, message = "Phone Number Must Contain Exact 11 Digits!"),
        custom = "crate::validation::validate_numeric"
    )]
    pub phone: Option<String>,

    #[validate(
        required(message = "National Identity Number Is Required!"),
        length(equal = 9, message = "National Identity Number Must Contain Exact 9 Digits!"),
        custom = "crate::validation::validate_numeric"
    )]
    pub national_identity_number: Option<String>,

    #[validate(required(message = "DOB Is Required!"))]
    #[schema(value_type = Option<String>, example = "1990-04-12")]
    pub dob: Option<NaiveDate>,

    #[validate(
        required(message = "Gender Is Required!"),
        custom = "crate::validation::validate_gender"
    )]
    pub gender: Option<String>,

    #[serde(rename = "appointment_date")]
    #[validate(required(message = "Appointment Date Is Required!"))]
    #[schema(value_type = Option<String>, example = "2026-11-02")]
    pub appointment_date: Option<NaiveDate>,

    #[validate(
        required(message = "Department Name Is Required!"),
        length(min = 1, message = "Department Name Is Required!")
    )]
    pub department: Option<String>,

    #[serde(rename = "doctor_firstName")]
    #[validate(
        required(message = "Doctor's First Name Is Required!"),
        length(min = 2, message = "Doctor's First Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub doctor_first_name: Option<String>,

    #[serde(rename = "doctor_lastName")]
    #[validate(
        required(message = "Doctor's Last Name Is Required!"),
        length(min = 2, message = "Doctor's Last Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub doctor_last_name: Option<String>,

    #[serde(default)]
    pub has_visited: bool,

    #[validate(
        required(message = "Address Is Required!"),
        length(min = 1, message = "Address Is Required!")
    )]
    pub address: Option<String>,
}

/// Request DTO for updating appointment status; no other field is accepted
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    #[validate(
        required(message = "Status Is Required!"),
        custom = "crate::validation::validate_appointment_status"
    )]
    #[schema(example = "Accepted")]
    pub status: Option<String>,
}

/// Payload carrying a single appointment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentEnvelope {
    pub success: bool,
    pub message: String,
    pub appointment: AppointmentResponse,
}

/// Payload carrying every appointment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<AppointmentResponse>,
}
