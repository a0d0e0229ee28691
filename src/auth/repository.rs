// Identity repository: trait seam plus the Postgres implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{NewUser, Role, User},
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, national_identity_number, \
     dob, gender, role, password_hash, doctor_department, avatar_public_id, avatar_url, created_at";

/// Persistence operations on identities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity; a duplicate email yields `EmailAlreadyExists`
    async fn create(&self, user: NewUser) -> Result<User, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Exact, case-sensitive lookup; `department` is only compared when given
    async fn find_by_role_and_name(
        &self,
        first_name: &str,
        last_name: &str,
        role: Role,
        department: Option<&str>,
    ) -> Result<Vec<User>, AuthError>;

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AuthError>;
}

/// Postgres-backed identity repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AuthError> {
        let (avatar_public_id, avatar_url) = match user.doctor_avatar {
            Some(avatar) => (Some(avatar.public_id), Some(avatar.url)),
            None => (None, None),
        };

        let query = format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, phone, national_identity_number,
                               dob, gender, role, password_hash, doctor_department,
                               avatar_public_id, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.national_identity_number)
            .bind(user.dob)
            .bind(user.gender)
            .bind(user.role)
            .bind(&user.password_hash)
            .bind(&user.doctor_department)
            .bind(avatar_public_id)
            .bind(avatar_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // The unique constraint closes the check-then-insert race
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::EmailAlreadyExists(format!(
                            "{} with this same email already exists!",
                            user.role
                        ));
                    }
                }
                AuthError::DatabaseError(e.to_string())
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_role_and_name(
        &self,
        first_name: &str,
        last_name: &str,
        role: Role,
        department: Option<&str>,
    ) -> Result<Vec<User>, AuthError> {
        let query = format!(
            r#"
            SELECT {}
            FROM users
            WHERE first_name = $1
              AND last_name = $2
              AND role = $3
              AND ($4::text IS NULL OR doctor_department = $4)
            ORDER BY created_at
            "#,
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(first_name)
            .bind(last_name)
            .bind(role)
            .bind(department)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AuthError> {
        let query = format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY last_name, first_name",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
