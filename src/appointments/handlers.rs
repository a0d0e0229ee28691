// HTTP handlers for appointment endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::appointments::{
    AppointmentEnvelope, AppointmentStatus, AppointmentsResponse,
    CreateAppointmentRequest, UpdateStatusRequest,
};
use crate::auth::middleware::{AdminUser, PatientUser};
use crate::auth::models::MessageResponse;
use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

/// Handler for POST /api/v1/appointment/post
/// Books an appointment for the authenticated patient
#[utoipa::path(
    post,
    path = "/api/v1/appointment/post",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment booked with status Pending", body = AppointmentEnvelope),
        (status = 400, description = "Validation failure, ambiguous doctor or missing session", body = ErrorResponse),
        (status = 403, description = "Caller is not a patient", body = ErrorResponse),
        (status = 404, description = "No doctor matches the name and department", body = ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    patient: PatientUser,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<Json<AppointmentEnvelope>, ApiError> {
    let Json(request) = payload?;

    let appointment = state
        .appointment_service
        .create_appointment(patient.user.id, request)
        .await?;

    Ok(Json(AppointmentEnvelope {
        success: true,
        message: "Appointment Send successfully!".to_string(),
        appointment: appointment.into(),
    }))
}

/// Handler for GET /api/v1/appointment/getall
/// Lists every appointment (Admin only)
#[utoipa::path(
    get,
    path = "/api/v1/appointment/getall",
    responses(
        (status = 200, description = "All appointments, newest first", body = AppointmentsResponse),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = state.appointment_service.list_appointments().await?;

    Ok(Json(AppointmentsResponse {
        success: true,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}

/// Handler for PUT /api/v1/appointment/update/:id
/// Sets the status of an appointment (Admin only)
#[utoipa::path(
    put,
    path = "/api/v1/appointment/update/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AppointmentEnvelope),
        (status = 400, description = "Invalid status, extra fields or missing session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    admin: AdminUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<AppointmentEnvelope>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    request.validate()?;

    let status: AppointmentStatus = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)?;
    tracing::debug!("Admin {} setting appointment {} to {}", admin.user.id, id, status);

    let appointment = state.appointment_service.update_status(id, status).await?;

    Ok(Json(AppointmentEnvelope {
        success: true,
        message: "Appointment Status Updated successfully!".to_string(),
        appointment: appointment.into(),
    }))
}

/// Handler for DELETE /api/v1/appointment/delete/:id
/// Removes an appointment (Admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/appointment/delete/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    admin: AdminUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    tracing::debug!("Admin {} deleting appointment {}", admin.user.id, id);
    state.appointment_service.delete_appointment(id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Appointment Deleted!".to_string(),
    }))
}
