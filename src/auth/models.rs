// Identity data models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role of a registered identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Admin => "Admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Role::Patient),
            "Doctor" => Ok(Role::Doctor),
            "Admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gender recorded on identities and appointment snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    #[sqlx(rename = "Non-binary")]
    NonBinary,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Non-binary" => Ok(Gender::NonBinary),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    pub password_hash: String,
    pub doctor_department: Option<String>,
    pub avatar_public_id: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reference to a doctor's avatar in object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoctorAvatar {
    pub public_id: String,
    pub url: String,
}

/// Identity response model (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_avatar: Option<DoctorAvatar>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let doctor_avatar = match (user.avatar_public_id, user.avatar_url) {
            (Some(public_id), Some(url)) => Some(DoctorAvatar { public_id, url }),
            _ => None,
        };

        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            national_identity_number: user.national_identity_number,
            dob: user.dob,
            gender: user.gender,
            role: user.role,
            doctor_department: user.doctor_department,
            doctor_avatar,
            created_at: user.created_at,
        }
    }
}

/// Validated identity ready to be persisted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub national_identity_number: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    pub password_hash: String,
    pub doctor_department: Option<String>,
    pub doctor_avatar: Option<DoctorAvatar>,
}

/// Registration form shared by patients, admins and doctors
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation failure naming it, not as a decoding error.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "First Name Is Required!"),
        length(min = 2, message = "First Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    #[schema(example = "Jane")]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last Name Is Required!"),
        length(min = 2, message = "Last Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email Is Required!"),
        email(message = "Please Provide A Valid Email!")
    )]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone Number Is Required!"),
        length(equal = 11, message = "Phone Number Must Contain Exact 11 Digits!"),
        custom = "crate::validation::validate_numeric"
    )]
    #[schema(example = "03001234567")]
    pub phone: Option<String>,

    #[validate(
        required(message = "National Identity Number Is Required!"),
        length(equal = 9, message = "National Identity Number Must Contain Exact 9 Digits!"),
        custom = "crate::validation::validate_numeric"
    )]
    #[schema(example = "123456789")]
    pub national_identity_number: Option<String>,

    #[validate(required(message = "DOB Is Required!"))]
    #[schema(value_type = Option<String>, example = "1990-04-12")]
    pub dob: Option<NaiveDate>,

    #[validate(
        required(message = "Gender Is Required!"),
        custom = "crate::validation::validate_gender"
    )]
    #[schema(example = "Female")]
    pub gender: Option<String>,

    #[validate(
        required(message = "Password Is Required!"),
        custom = "crate::validation::validate_strong_password"
    )]
    #[schema(example = "Secret#123")]
    pub password: Option<String>,

    #[validate(required(message = "Confirm Password Is Required!"))]
    #[schema(example = "Secret#123")]
    pub confirm_password: Option<String>,

    /// Only read when registering a doctor
    #[schema(example = "Cardiology")]
    pub doctor_department: Option<String>,
}

/// Login request DTO
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required(message = "Email Is Required!"))]
    pub email: Option<String>,

    #[validate(required(message = "Password Is Required!"))]
    pub password: Option<String>,

    #[validate(required(message = "Role Is Required!"))]
    pub role: Option<String>,
}

/// Payload returned when a session is issued
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Payload carrying a single identity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserResponse,
}

/// Payload carrying the doctor directory
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorsResponse {
    pub success: bool,
    pub doctors: Vec<UserResponse>,
}

/// Payload carrying only a status message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
