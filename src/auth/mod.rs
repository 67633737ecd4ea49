pub mod cookies;
pub mod jwt;
pub mod password;

pub use cookies::{CookiePolicy, SessionCookies};
pub use jwt::Claims;
pub use password::{hash_password, verify_password};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}
