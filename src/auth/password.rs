// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service for hashing and verification
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a fresh random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("Argon2 hashing failed: {}", e);
                AuthError::PasswordHashError
            })
    }

    /// Hash on the blocking pool so Argon2 never stalls a runtime worker
    pub async fn hash(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                AuthError::PasswordHashError
            })?
    }

    /// Verify on the blocking pool
    pub async fn verify(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                AuthError::PasswordHashError
            })?
    }

    /// Verify a password against a stored PHC hash string
    ///
    /// Returns `Ok(false)` on mismatch; an unparsable stored hash is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Stored password hash is malformed: {}", e);
            AuthError::PasswordHashError
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
