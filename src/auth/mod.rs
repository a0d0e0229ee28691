// Authentication module
// Identity registration, login, cookie-bound sessions and role guards

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::{AdminUser, Authenticated, PatientUser, SessionGuard};
pub use models::{Role, User, UserResponse};
pub use repository::{PgUserRepository, UserRepository};
pub use service::AuthService;
pub use session::SessionIssuer;
pub use token::TokenService;
