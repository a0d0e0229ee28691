// HTTP handlers for identity and session endpoints

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{
    error::AuthError,
    middleware::{AdminUser, PatientUser},
    models::{
        AuthResponse, DoctorsResponse, LoginRequest, MessageResponse, RegisterRequest, Role,
        User, UserEnvelope,
    },
};
use crate::avatar::AvatarUpload;
use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

/// Multipart part carrying the doctor's avatar
const AVATAR_FIELD: &str = "doctorAvatar";

fn issue_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
    message: &str,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let (jar, token) = state.sessions.issue(jar, user.id, user.role)?;
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: message.to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Register a patient and open their session
#[utoipa::path(
    post,
    path = "/api/v1/user/patient/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Patient registered, session cookie set", body = AuthResponse),
        (status = 400, description = "Validation failure or email already registered", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register_patient(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Registering patient: {:?}", request.email);

    let user = state.auth_service.register(request, Role::Patient).await?;
    issue_session(&state, jar, user, "User Registered!")
}

/// Log in with email, password and the role being claimed
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid credentials or role", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Login attempt: {:?}", request.email);

    let user = state.auth_service.login(request).await?;
    tracing::info!("User {} logged in as {}", user.id, user.role);
    issue_session(&state, jar, user, "User Logged in successfully!")
}

/// Register another admin (Admin only)
#[utoipa::path(
    post,
    path = "/api/v1/user/admin/addnew",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Admin registered", body = UserEnvelope),
        (status = 400, description = "Validation failure, duplicate email or missing session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn add_admin(
    State(state): State<AppState>,
    admin: AdminUser,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Admin {} adding admin {:?}", admin.user.id, request.email);

    let created = state.auth_service.register(request, Role::Admin).await?;
    Ok(Json(UserEnvelope {
        success: true,
        message: Some("New Admin Registered".to_string()),
        user: created.into(),
    }))
}

/// Register a doctor from a multipart form with a `doctorAvatar` file (Admin only)
#[utoipa::path(
    post,
    path = "/api/v1/user/doctor/addnew",
    request_body(content = RegisterRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Doctor registered", body = UserEnvelope),
        (status = 400, description = "Missing avatar, unsupported format, validation failure or duplicate email", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Avatar upload failed", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn add_doctor(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<UserEnvelope>, ApiError> {
    let mut fields = serde_json::Map::new();
    let mut avatar = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == AVATAR_FIELD {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            avatar = Some(AvatarUpload {
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await?;
            fields.insert(name, serde_json::Value::String(value));
        }
    }

    let request: RegisterRequest = serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| AuthError::InvalidInput(e.to_string()))?;
    tracing::debug!("Admin {} adding doctor {:?}", admin.user.id, request.email);

    let doctor = state.auth_service.register_doctor(request, avatar).await?;
    Ok(Json(UserEnvelope {
        success: true,
        message: Some("New Doctor Registered".to_string()),
        user: doctor.into(),
    }))
}

/// List every doctor
#[utoipa::path(
    get,
    path = "/api/v1/user/doctors",
    responses(
        (status = 200, description = "Doctor directory", body = DoctorsResponse)
    ),
    tag = "users"
)]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let doctors = state.auth_service.list_doctors().await?;
    Ok(Json(DoctorsResponse {
        success: true,
        doctors: doctors.into_iter().map(Into::into).collect(),
    }))
}

/// Current admin
#[utoipa::path(
    get,
    path = "/api/v1/user/admin/me",
    responses(
        (status = 200, description = "The authenticated admin", body = UserEnvelope),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn admin_me(admin: AdminUser) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        success: true,
        message: None,
        user: admin.user.into(),
    })
}

/// Current patient
#[utoipa::path(
    get,
    path = "/api/v1/user/patient/me",
    responses(
        (status = 200, description = "The authenticated patient", body = UserEnvelope),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not a patient", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn patient_me(patient: PatientUser) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        success: true,
        message: None,
        user: patient.user.into(),
    })
}

/// End the admin session
#[utoipa::path(
    get,
    path = "/api/v1/user/admin/logout",
    responses(
        (status = 200, description = "adminToken cleared", body = MessageResponse),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn admin_logout(
    State(state): State<AppState>,
    admin: AdminUser,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::info!("Admin {} logged out", admin.user.id);
    (
        state.sessions.end(jar, Role::Admin),
        Json(MessageResponse {
            success: true,
            message: "Admin Logged Out Successfully.".to_string(),
        }),
    )
}

/// End the patient session
#[utoipa::path(
    get,
    path = "/api/v1/user/patient/logout",
    responses(
        (status = 200, description = "patientToken cleared", body = MessageResponse),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn patient_logout(
    State(state): State<AppState>,
    patient: PatientUser,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::info!("Patient {} logged out", patient.user.id);
    (
        state.sessions.end(jar, Role::Patient),
        Json(MessageResponse {
            success: true,
            message: "Patient Logged Out Successfully.".to_string(),
        }),
    )
}
