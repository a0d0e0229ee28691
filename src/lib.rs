pub mod appointments;
pub mod auth;
pub mod avatar;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod messages;
pub mod validation;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use appointments::{
    AppointmentEnvelope, AppointmentRepository, AppointmentResponse, AppointmentService,
    AppointmentStatus, AppointmentsResponse, CreateAppointmentRequest, DoctorName,
    DoctorResolver, PgAppointmentRepository, UpdateStatusRequest,
};
use auth::models::{
    AuthResponse, DoctorAvatar, DoctorsResponse, Gender, LoginRequest, MessageResponse,
    RegisterRequest, Role, UserEnvelope, UserResponse,
};
use auth::{AuthService, PgUserRepository, SessionIssuer, TokenService, UserRepository};
use avatar::{AvatarStore, LocalAvatarStore};
use config::Config;
use error::ErrorResponse;
use messages::{
    MessageRepository, MessageService, MessageView, MessagesResponse, PgMessageRepository,
    SendMessageRequest,
};

/// Avatars larger than this are rejected before reaching the handler
const AVATAR_BODY_LIMIT: usize = 5 * 1024 * 1024;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_patient,
        auth::handlers::login,
        auth::handlers::add_admin,
        auth::handlers::add_doctor,
        auth::handlers::list_doctors,
        auth::handlers::admin_me,
        auth::handlers::patient_me,
        auth::handlers::admin_logout,
        auth::handlers::patient_logout,
        appointments::handlers::create_appointment,
        appointments::handlers::list_appointments,
        appointments::handlers::update_appointment_status,
        appointments::handlers::delete_appointment,
        messages::handlers::send_message,
        messages::handlers::list_messages,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, AuthResponse, UserEnvelope, UserResponse,
            DoctorsResponse, DoctorAvatar, MessageResponse, Role, Gender,
            CreateAppointmentRequest, UpdateStatusRequest, AppointmentEnvelope,
            AppointmentsResponse, AppointmentResponse, AppointmentStatus, DoctorName,
            SendMessageRequest, MessagesResponse, MessageView, ErrorResponse
        )
    ),
    tags(
        (name = "users", description = "Registration, login and sessions"),
        (name = "appointments", description = "Appointment booking and administration"),
        (name = "messages", description = "Public contact form")
    ),
    info(
        title = "Hospital Appointment API",
        version = "1.0.0",
        description = "Patients book appointments with doctors; admins review them"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub appointment_service: AppointmentService,
    pub message_service: MessageService,
    pub sessions: SessionIssuer,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        messages: Arc<dyn MessageRepository>,
        avatars: Arc<dyn AvatarStore>,
        sessions: SessionIssuer,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users.clone(), avatars),
            appointment_service: AppointmentService::new(appointments, DoctorResolver::new(users)),
            message_service: MessageService::new(messages),
            sessions,
        }
    }

    /// State backed by Postgres and the local avatar directory
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgAppointmentRepository::new(pool.clone())),
            Arc::new(PgMessageRepository::new(pool)),
            Arc::new(LocalAvatarStore::new(
                config.avatar_dir.clone(),
                config.avatar_base_url.clone(),
            )),
            session_issuer(config),
        )
    }
}

pub fn session_issuer(config: &Config) -> SessionIssuer {
    SessionIssuer::new(
        TokenService::new(config.jwt_secret.clone(), config.jwt_expires_secs),
        config.cookie_expire_days,
    )
}

/// Credentialed CORS for the configured front-ends, or any origin when none is set
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    use appointments::handlers as appointment;
    use auth::handlers as user;
    use messages::handlers as message;

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Identity and sessions
        .route("/api/v1/user/patient/register", post(user::register_patient))
        .route("/api/v1/user/login", post(user::login))
        .route("/api/v1/user/admin/addnew", post(user::add_admin))
        .route(
            "/api/v1/user/doctor/addnew",
            post(user::add_doctor).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/api/v1/user/doctors", get(user::list_doctors))
        .route("/api/v1/user/admin/me", get(user::admin_me))
        .route("/api/v1/user/patient/me", get(user::patient_me))
        .route("/api/v1/user/admin/logout", get(user::admin_logout))
        .route("/api/v1/user/patient/logout", get(user::patient_logout))
        // Appointments
        .route("/api/v1/appointment/post", post(appointment::create_appointment))
        .route("/api/v1/appointment/getall", get(appointment::list_appointments))
        .route(
            "/api/v1/appointment/update/:id",
            put(appointment::update_appointment_status),
        )
        .route(
            "/api/v1/appointment/delete/:id",
            delete(appointment::delete_appointment),
        )
        // Contact form
        .route("/api/v1/message/send", post(message::send_message))
        .route("/api/v1/message/getall", get(message::list_messages))
        // Stored doctor avatars
        .nest_service("/avatars", ServeDir::new(&config.avatar_dir))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}
