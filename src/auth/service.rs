// Authentication service - business logic layer

use std::borrow::Cow;
use std::sync::Arc;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::{
    error::AuthError,
    models::{DoctorAvatar, LoginRequest, NewUser, RegisterRequest, Role, User},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};
use crate::avatar::{AvatarStore, AvatarUpload};

/// Authentication service coordinating registration, login and session lookup
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    avatars: Arc<dyn AvatarStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, avatars: Arc<dyn AvatarStore>) -> Self {
        Self { users, avatars }
    }

    /// Register a patient or an admin
    ///
    /// The role comes from the route, never from the form.
    pub async fn register(&self, request: RegisterRequest, role: Role) -> Result<User, AuthError> {
        request.validate()?;
        check_confirmation(&request)?;

        if let Some(existing) = self.find_email(&request).await? {
            let message = match role {
                Role::Patient => "User already Registered!".to_string(),
                _ => format!("{} with this same email already exists!", existing.role),
            };
            tracing::warn!("Registration rejected, email already registered as {}", existing.role);
            return Err(AuthError::EmailAlreadyExists(message));
        }

        let user = self
            .users
            .create(into_new_user(request, role, None).await?)
            .await?;
        tracing::info!("Registered {} {}", user.role, user.id);
        Ok(user)
    }

    /// Register a doctor with an avatar
    ///
    /// The avatar is checked first, then the form. The file is staged to disk,
    /// handed to the avatar store and the staged copy is always discarded.
    pub async fn register_doctor(
        &self,
        request: RegisterRequest,
        avatar: Option<AvatarUpload>,
    ) -> Result<User, AuthError> {
        let avatar = avatar
            .filter(|upload| !upload.bytes.is_empty())
            .ok_or_else(|| AuthError::InvalidInput("Doctor Avatar Required!".to_string()))?;
        if !avatar.is_supported() {
            tracing::debug!("Rejected avatar of type {}", avatar.content_type);
            return Err(AuthError::InvalidInput("File Format Not Supported!".to_string()));
        }

        validate_doctor_form(&request)?;
        check_confirmation(&request)?;

        if self.find_email(&request).await?.is_some() {
            tracing::warn!("Doctor registration rejected, email already registered");
            return Err(AuthError::EmailAlreadyExists(
                "Doctor With This Email Already Exists!".to_string(),
            ));
        }

        let stored = self.store_avatar(&avatar).await?;
        let doctor = self
            .users
            .create(into_new_user(request, Role::Doctor, Some(stored)).await?)
            .await?;

        tracing::info!("Registered doctor {}", doctor.id);
        Ok(doctor)
    }

    /// Check credentials and the claimed role
    pub async fn login(&self, request: LoginRequest) -> Result<User, AuthError> {
        request.validate()?;
        let (Some(email), Some(password), Some(claimed_role)) =
            (request.email, request.password, request.role)
        else {
            return Err(AuthError::Validation(ValidationErrors::new()));
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify(password, user.password_hash.clone()).await? {
            tracing::warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        // A role name that does not exist matches nobody
        if claimed_role.parse::<Role>().ok() != Some(user.role) {
            tracing::warn!(
                "Login for user {} claimed role {} but holds {}",
                user.id,
                claimed_role,
                user.role
            );
            return Err(AuthError::RoleMismatch);
        }

        Ok(user)
    }

    /// Resolve a session token to a live identity
    ///
    /// A verified token whose identity no longer exists is rejected.
    pub async fn resolve_session(
        &self,
        token: &str,
        tokens: &TokenService,
    ) -> Result<User, AuthError> {
        let claims = tokens.validate_session_token(token)?;
        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            tracing::warn!("Session token names unknown user {}", claims.sub);
            AuthError::UnknownUser
        })
    }

    pub async fn list_doctors(&self) -> Result<Vec<User>, AuthError> {
        let doctors = self.users.list_by_role(Role::Doctor).await?;
        tracing::debug!("Retrieved {} doctors", doctors.len());
        Ok(doctors)
    }

    async fn find_email(&self, request: &RegisterRequest) -> Result<Option<User>, AuthError> {
        match request.email.as_deref() {
            Some(email) => self.users.find_by_email(email).await,
            None => Ok(None),
        }
    }

    async fn store_avatar(&self, avatar: &AvatarUpload) -> Result<DoctorAvatar, AuthError> {
        let staged = avatar.stage().await.map_err(AuthError::AvatarUpload)?;
        let result = self.avatars.upload(staged.path()).await;
        staged.discard().await;
        result.map_err(AuthError::AvatarUpload)
    }
}

fn check_confirmation(request: &RegisterRequest) -> Result<(), AuthError> {
    if request.password != request.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

/// The shared form rules plus a mandatory department
fn validate_doctor_form(request: &RegisterRequest) -> Result<(), AuthError> {
    let mut errors = match request.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    let department_missing = request
        .doctor_department
        .as_deref()
        .map_or(true, |d| d.trim().is_empty());
    if department_missing {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::from("Doctor Department Is Required!"));
        errors.add("doctor_department", error);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

/// Build the record to persist; the plaintext password is dropped here
async fn into_new_user(
    request: RegisterRequest,
    role: Role,
    doctor_avatar: Option<DoctorAvatar>,
) -> Result<NewUser, AuthError> {
    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(phone),
        Some(national_identity_number),
        Some(dob),
        Some(gender),
        Some(password),
    ) = (
        request.first_name,
        request.last_name,
        request.email,
        request.phone,
        request.national_identity_number,
        request.dob,
        request.gender,
        request.password,
    )
    else {
        return Err(AuthError::Validation(ValidationErrors::new()));
    };

    Ok(NewUser {
        first_name,
        last_name,
        email,
        phone,
        national_identity_number,
        dob,
        gender: gender.parse().map_err(AuthError::InvalidInput)?,
        role,
        password_hash: PasswordService::hash(password).await?,
        doctor_department: match role {
            Role::Doctor => request.doctor_department,
            _ => None,
        },
        doctor_avatar,
    })
}
