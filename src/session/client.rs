use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::PublicUser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 401: bad credentials, or an invalid or expired token
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotActivated(String),

    #[error("Réponse de connexion sans token")]
    MissingToken,

    /// Any other failure: network, server error, undecodable body
    #[error("{0}")]
    Transport(String),
}

/// What the login endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: Option<String>,
    pub user: PublicUser,
    /// Raw `Set-Cookie` values of the response
    pub set_cookies: Vec<String>,
}

/// Network seam of the authentication context.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn verify(&self, token: &str) -> Result<PublicUser, SessionError>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, SessionError>;

    async fn logout(&self) -> Result<(), SessionError>;
}
