// Session issuing: binds a signed token to a role-scoped cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Cookie holding an Admin session
pub const ADMIN_COOKIE: &str = "adminToken";
/// Cookie holding every non-Admin session
pub const PATIENT_COOKIE: &str = "patientToken";

/// Cookie namespace for a role; only Admin has its own
pub fn cookie_name_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_COOKIE,
        Role::Patient | Role::Doctor => PATIENT_COOKIE,
    }
}

/// Issues and revokes cookie-bound sessions
#[derive(Clone)]
pub struct SessionIssuer {
    tokens: TokenService,
    cookie_max_age: Duration,
}

impl SessionIssuer {
    pub fn new(tokens: TokenService, cookie_expire_days: i64) -> Self {
        Self {
            tokens,
            cookie_max_age: Duration::days(cookie_expire_days),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Sign a token for the identity and set it on the role's cookie
    ///
    /// Returns the updated jar and the raw token.
    pub fn issue(
        &self,
        jar: CookieJar,
        user_id: uuid::Uuid,
        role: Role,
    ) -> Result<(CookieJar, String), AuthError> {
        let token = self.tokens.generate_session_token(user_id)?;

        let cookie = Cookie::build((cookie_name_for(role), token.clone()))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .path("/")
            .max_age(self.cookie_max_age);

        tracing::debug!("Issued {} session for user {}", role, user_id);
        Ok((jar.add(cookie), token))
    }

    /// Overwrite the role's cookie with an empty, already expired value
    pub fn end(&self, jar: CookieJar, role: Role) -> CookieJar {
        let cookie = Cookie::build((cookie_name_for(role), ""))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .path("/")
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::now_utc());

        jar.add(cookie)
    }
}
