// Cookie-based session guard for protected routes

use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::{Role, User},
    session::{ADMIN_COOKIE, PATIENT_COOKIE},
};
use crate::AppState;

/// Which cookie a guard reads and which role it admits
pub trait SessionGuard: Send + Sync + 'static {
    const COOKIE: &'static str;
    const ROLE: Role;
    /// Reported when the cookie is absent
    const MISSING: &'static str;
}

/// Admin sessions, read from `adminToken`
#[derive(Debug, Clone)]
pub struct AdminSession;

impl SessionGuard for AdminSession {
    const COOKIE: &'static str = ADMIN_COOKIE;
    const ROLE: Role = Role::Admin;
    const MISSING: &'static str = "Admin is not authenticated!";
}

/// Patient sessions, read from `patientToken`
#[derive(Debug, Clone)]
pub struct PatientSession;

impl SessionGuard for PatientSession {
    const COOKIE: &'static str = PATIENT_COOKIE;
    const ROLE: Role = Role::Patient;
    const MISSING: &'static str = "User is not authenticated!";
}

/// Identity resolved from a session cookie and checked against the guard's role
#[derive(Debug, Clone)]
pub struct Authenticated<G> {
    pub user: User,
    _guard: PhantomData<fn() -> G>,
}

pub type AdminUser = Authenticated<AdminSession>;
pub type PatientUser = Authenticated<PatientSession>;

#[async_trait]
impl<G: SessionGuard> FromRequestParts<AppState> for Authenticated<G> {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(G::COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                debug!("Missing {} cookie for endpoint: {}", G::COOKIE, endpoint);
                AuthError::MissingToken(G::MISSING)
            })?;

        let user = state
            .auth_service
            .resolve_session(&token, state.sessions.tokens())
            .await?;

        if user.role != G::ROLE {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}, endpoint={}",
                user.id,
                G::ROLE,
                user.role,
                endpoint
            );
            return Err(AuthError::Forbidden {
                required: G::ROLE,
                actual: user.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            user.id, user.role, endpoint
        );
        Ok(Self {
            user,
            _guard: PhantomData,
        })
    }
}
