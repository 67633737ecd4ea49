//! HTTP side of the client tier: the JSON API client, the network
//! implementation of `session::AuthClient` and the cancellable fetcher.

pub mod api;
pub mod auth;
pub mod fetch;

pub use api::{ApiClient, ApiReply};
pub use auth::HttpAuthClient;
pub use fetch::{FetchError, Fetcher, Pending};

use thiserror::Error;

use crate::form::FieldErrors;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Error envelope returned by the server
    #[error("{message}")]
    Api { status: u16, message: String, field_errors: FieldErrors },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Réponse illisible: {0}")]
    Decode(String),

    #[error("URL invalide: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Fetch(FetchError::from(err))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Fetch(inner) => inner,
            other => FetchError::Other(other.to_string()),
        }
    }
}
