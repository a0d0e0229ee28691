// Runtime configuration loaded from the environment (and `.env` via dotenv)

use std::path::PathBuf;

/// Longest accepted session token lifetime (ten years)
const MAX_JWT_EXPIRES_SECS: i64 = 10 * 365 * 24 * 60 * 60;
/// Longest accepted session cookie lifetime
const MAX_COOKIE_EXPIRE_DAYS: i64 = 10 * 365;

/// Errors raised while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub jwt_expires_secs: i64,
    /// Session cookie lifetime in days
    pub cookie_expire_days: i64,
    /// Browser origins allowed to send credentialed requests
    pub allowed_origins: Vec<String>,
    /// Directory where uploaded doctor avatars are kept
    pub avatar_dir: PathBuf,
    /// Public URL prefix under which avatars are served
    pub avatar_base_url: String,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        let port = parse_number("PORT", or_default("PORT", "8080"), u16::MAX)?;
        let jwt_expires_secs = parse_number(
            "JWT_EXPIRES_SECS",
            or_default("JWT_EXPIRES_SECS", "604800"),
            MAX_JWT_EXPIRES_SECS,
        )?;
        let cookie_expire_days = parse_number(
            "COOKIE_EXPIRE_DAYS",
            or_default("COOKIE_EXPIRE_DAYS", "7"),
            MAX_COOKIE_EXPIRE_DAYS,
        )?;

        let allowed_origins = ["FRONTEND_URL", "DASHBOARD_URL"]
            .iter()
            .filter_map(|name| lookup(name))
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: or_default("HOST", "0.0.0.0"),
            port,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expires_secs,
            cookie_expire_days,
            allowed_origins,
            avatar_dir: PathBuf::from(or_default("AVATAR_DIR", "./uploads/avatars")),
            avatar_base_url: or_default("AVATAR_BASE_URL", "/avatars")
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Positive number no greater than `max`
fn parse_number<T>(name: &'static str, value: String, max: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() && parsed <= max => Ok(parsed),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
