// Fixtures shared by unit and HTTP tests

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::appointments::CreateAppointmentRequest;
use crate::auth::models::{DoctorAvatar, Gender, NewUser, RegisterRequest, Role, User};
use crate::auth::repository::UserRepository;
use crate::avatar::{AvatarStore, LocalAvatarStore};
use crate::config::Config;
use crate::memory::MemoryStore;
use crate::{session_issuer, AppState};

/// Password every seeded identity can log in with
pub const TEST_PASSWORD: &str = "Secret#123";

/// Signing secret used by `test_config`
pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

// Hashed once; Argon2 is slow in debug builds
static TEST_PASSWORD_HASH: Lazy<String> = Lazy::new(|| {
    crate::auth::password::PasswordService::hash_password(TEST_PASSWORD).unwrap()
});

pub fn new_user(
    first_name: &str,
    last_name: &str,
    email: &str,
    role: Role,
    department: Option<&str>,
) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: "03001234567".to_string(),
        national_identity_number: "123456789".to_string(),
        dob: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap_or_default(),
        gender: Gender::Female,
        role,
        password_hash: TEST_PASSWORD_HASH.clone(),
        doctor_department: department.map(str::to_string),
        doctor_avatar: (role == Role::Doctor).then(|| DoctorAvatar {
            public_id: format!("doctor_avatars/{}", email),
            url: format!("/avatars/{}.png", email),
        }),
    }
}

pub async fn seed_user(store: &MemoryStore, user: NewUser) -> User {
    UserRepository::create(store, user).await.unwrap()
}

pub fn register_request(first_name: &str, last_name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        email: Some(email.to_string()),
        phone: Some("03001234567".to_string()),
        national_identity_number: Some("123456789".to_string()),
        dob: NaiveDate::from_ymd_opt(1990, 4, 12),
        gender: Some("Female".to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        confirm_password: Some(TEST_PASSWORD.to_string()),
        doctor_department: None,
    }
}

pub fn booking_request(
    doctor_first_name: &str,
    doctor_last_name: &str,
    department: &str,
) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: Some("03001234567".to_string()),
        national_identity_number: Some("123456789".to_string()),
        dob: NaiveDate::from_ymd_opt(1990, 4, 12),
        gender: Some("Female".to_string()),
        appointment_date: NaiveDate::from_ymd_opt(2026, 11, 2),
        department: Some(department.to_string()),
        doctor_first_name: Some(doctor_first_name.to_string()),
        doctor_last_name: Some(doctor_last_name.to_string()),
        has_visited: false,
        address: Some("1 Main Street".to_string()),
    }
}

pub fn test_config(avatar_dir: &std::path::Path) -> Config {
    let avatar_dir = avatar_dir.to_string_lossy().to_string();
    Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some("postgresql://localhost/hospital_test".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "AVATAR_DIR" => Some(avatar_dir.clone()),
        _ => None,
    })
    .unwrap()
}

/// State over a single in-memory store, with avatars written to `avatar_dir`
pub fn memory_state_with(store: Arc<MemoryStore>, config: &Config) -> AppState {
    let avatars: Arc<dyn AvatarStore> = Arc::new(LocalAvatarStore::new(
        config.avatar_dir.clone(),
        config.avatar_base_url.clone(),
    ));
    AppState::new(
        store.clone(),
        store.clone(),
        store,
        avatars,
        session_issuer(config),
    )
}

pub fn memory_state(store: Arc<MemoryStore>) -> AppState {
    memory_state_with(store, &test_config(&std::env::temp_dir().join("hospital-api-avatars")))
}
