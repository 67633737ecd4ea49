use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ClientError};
use crate::database::models::PublicUser;
use crate::session::{AuthClient, LoginOutcome, SessionError};

impl From<ClientError> for SessionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status: 401, message, .. } => SessionError::Unauthorized(message),
            ClientError::Api { status: 403, message, .. } => SessionError::NotActivated(message),
            other => SessionError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(default)]
    token: Option<String>,
    user: PublicUser,
}

/// `AuthClient` over the portal's `/verify`, `/login` and `/logout`.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    api: ApiClient,
}

impl HttpAuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn verify(&self, token: &str) -> Result<PublicUser, SessionError> {
        let api = self.api.clone().with_token(Some(token.to_string()));
        Ok(api.get("/verify").await?.into_data()?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        let reply = self.api.post("/login", &json!({ "email": email, "password": password })).await?;
        let set_cookies = reply.set_cookies.clone();
        let data: LoginData = reply.into_data()?;
        Ok(LoginOutcome { token: data.token, user: data.user, set_cookies })
    }

    async fn logout(&self) -> Result<(), SessionError> {
        self.api.post("/logout", &json!({})).await?.into_data::<serde_json::Value>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchError;
    use crate::form::FieldErrors;

    fn api_error(status: u16) -> ClientError {
        ClientError::Api { status, message: "msg".into(), field_errors: FieldErrors::new() }
    }

    #[test]
    fn maps_statuses_onto_session_errors() {
        assert_eq!(SessionError::from(api_error(401)), SessionError::Unauthorized("msg".into()));
        assert_eq!(SessionError::from(api_error(403)), SessionError::NotActivated("msg".into()));
        assert_eq!(SessionError::from(api_error(500)), SessionError::Transport("msg".into()));
        assert_eq!(
            SessionError::from(ClientError::Fetch(FetchError::Other("refused".into()))),
            SessionError::Transport("refused".into())
        );
    }

    #[test]
    fn login_data_tolerates_missing_token() {
        let data: LoginData = serde_json::from_value(json!({
            "user": {"id": 1, "nom": "N", "prenom": "P", "email": "a@b.ma", "role": 3, "filiereId": null, "valid": true}
        }))
        .unwrap();
        assert!(data.token.is_none());
        assert_eq!(data.user.id, 1);
    }
}
