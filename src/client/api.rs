use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::ClientError;
use crate::form::FieldErrors;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One decoded HTTP exchange with the API.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: Value,
    /// Raw `Set-Cookie` values, applied to the jar by the caller
    pub set_cookies: Vec<String>,
}

impl ApiReply {
    /// Unwraps `{"success": true, "data": ...}`; anything else becomes
    /// `ClientError::Api` carrying the server message and field errors.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let success = self.body.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !self.status.is_success() || !success {
            return Err(self.into_error());
        }
        let data = self.body.get("data").cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn into_error(self) -> ClientError {
        let message = self
            .body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Erreur inconnue").to_string());

        let field_errors: FieldErrors = self
            .body
            .get("field_errors")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|msg| (k.clone(), msg.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        ClientError::Api { status: self.status.as_u16(), message, field_errors }
    }
}

/// JSON client for the portal API.
///
/// Credentials go out both ways the server accepts them: the bearer token
/// when one is set, and the jar's `Cookie` header when one is set.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    cookie_header: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).gzip(true).build()?;
        Ok(Self { http, base_url, token: None, cookie_header: None })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_cookie_header(mut self, cookie_header: Option<String>) -> Self {
        self.cookie_header = cookie_header;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an API path against the base URL, keeping any base prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiReply, ClientError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "api request");

        let mut request = self.http.request(method, url).header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(cookies) = &self.cookie_header {
            request = request.header(header::COOKIE, cookies);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?
        };

        Ok(ApiReply { status, body, set_cookies })
    }

    pub async fn get(&self, path: &str) -> Result<ApiReply, ClientError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiReply, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiReply, ClientError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiReply, ClientError> {
        self.send(Method::DELETE, path, None).await
    }

    /// GET and unwrap the data envelope in one step.
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.get(path).await?.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u16, body: Value) -> ApiReply {
        ApiReply { status: StatusCode::from_u16(status).unwrap(), body, set_cookies: vec![] }
    }

    #[test]
    fn endpoints_keep_the_base_prefix() {
        let api = ApiClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(api.endpoint("/login").unwrap().as_str(), "http://localhost:3000/api/login");
        assert_eq!(api.endpoint("pfe/3").unwrap().as_str(), "http://localhost:3000/api/pfe/3");

        let root = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(root.endpoint("/verify").unwrap().as_str(), "http://localhost:3000/verify");
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn success_envelope_yields_data() {
        let ids: Vec<i64> = reply(200, json!({"success": true, "data": [1, 2]})).into_data().unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn error_envelope_keeps_message_and_fields() {
        let err = reply(400, json!({
            "success": false,
            "error": "Données invalides",
            "code": "VALIDATION_ERROR",
            "field_errors": {"email": "Adresse email invalide"}
        }))
        .into_data::<Value>()
        .unwrap_err();

        match err {
            ClientError::Api { status, message, field_errors } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Données invalides");
                assert_eq!(field_errors.get("email").map(String::as_str), Some("Adresse email invalide"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bodiless_error_falls_back_to_reason() {
        let err = reply(503, Value::Null).into_data::<Value>().unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Service Unavailable");
    }
}
