use crate::auth::cookies::{CookiePolicy, SessionCookies, AUTH_COOKIE};
use crate::database::models::PublicUser;
use crate::types::Role;

use super::client::{AuthClient, SessionError};
use super::jar::CookieJar;

pub const MSG_NOT_ACTIVATED: &str = "Votre compte n'est pas encore activé";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Authenticated(PublicUser),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&PublicUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Tokens issued before the switch to JWTs are opaque strings; they are
/// never sent for verification.
pub fn is_legacy_token(token: &str) -> bool {
    token.split('.').count() < 3
}

/// Session state derived from the cookie jar and one verification round-trip.
///
/// Fails closed: any verification outcome other than success leaves the
/// session anonymous. Only a 401 also clears the cookies.
pub struct AuthContext<C: AuthClient> {
    client: C,
    jar: CookieJar,
    policy: CookiePolicy,
    state: SessionState,
}

impl<C: AuthClient> AuthContext<C> {
    pub fn new(client: C, jar: CookieJar) -> Self {
        Self { client, jar, policy: CookiePolicy::default(), state: SessionState::Loading }
    }

    pub fn with_policy(mut self, policy: CookiePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.state.user()
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves the `Loading` state from the jar.
    pub async fn init(&mut self) -> &SessionState {
        self.state = SessionState::Loading;

        let token = match self.jar.get(AUTH_COOKIE) {
            Some(token) if !is_legacy_token(token) => token.to_string(),
            Some(_) => {
                tracing::debug!("Ignoring legacy session token");
                self.state = SessionState::Anonymous;
                return &self.state;
            }
            None => {
                self.state = SessionState::Anonymous;
                return &self.state;
            }
        };

        self.state = match self.client.verify(&token).await {
            Ok(user) => SessionState::Authenticated(user),
            Err(SessionError::Unauthorized(reason)) => {
                tracing::info!("Session rejected: {}", reason);
                self.jar.clear_session();
                self.persist();
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::warn!("Session verification failed: {}", e);
                SessionState::Anonymous
            }
        };
        &self.state
    }

    /// Logs in and, on success, writes the four session cookies.
    ///
    /// Unactivated student accounts and responses without a token are
    /// rejected without touching the jar.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&PublicUser, SessionError> {
        let outcome = self.client.login(email, password).await?;

        if outcome.user.role == Role::Student && !outcome.user.valid {
            return Err(SessionError::NotActivated(MSG_NOT_ACTIVATED.to_string()));
        }
        let token = outcome.token.filter(|t| !t.is_empty()).ok_or(SessionError::MissingToken)?;

        let cookies = SessionCookies {
            token,
            role: outcome.user.role,
            user_id: outcome.user.id,
            filiere_id: outcome.user.filiere_id,
        };
        for header in cookies.set_cookie_headers(&self.policy) {
            self.jar.apply_set_cookie(&header);
        }
        self.persist();

        self.state = SessionState::Authenticated(outcome.user);
        match &self.state {
            SessionState::Authenticated(user) => Ok(user),
            _ => Err(SessionError::MissingToken),
        }
    }

    /// Clears the session locally whatever the server answers.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.jar.clear_session();
        self.persist();
        self.state = SessionState::Anonymous;
    }

    fn persist(&self) {
        if let Err(e) = self.jar.save() {
            tracing::warn!("Failed to persist cookies: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::{FILIERE_COOKIE, ROLE_COOKIE, USER_ID_COOKIE};
    use crate::session::client::LoginOutcome;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn user(role: Role, valid: bool) -> PublicUser {
        PublicUser {
            id: 7,
            nom: "Alami".into(),
            prenom: "Sara".into(),
            email: "sara@uni.ma".into(),
            role,
            filiere_id: Some(2),
            valid,
            cne: None,
            telephone: None,
            date_naissance: None,
        }
    }

    struct MockClient {
        verify: Result<PublicUser, SessionError>,
        login: Result<LoginOutcome, SessionError>,
        verified_tokens: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn verifying(verify: Result<PublicUser, SessionError>) -> Self {
            Self { verify, login: Err(SessionError::Transport("unused".into())), verified_tokens: Mutex::new(vec![]) }
        }

        fn logging_in(login: Result<LoginOutcome, SessionError>) -> Self {
            Self {
                verify: Err(SessionError::Transport("unused".into())),
                login,
                verified_tokens: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl AuthClient for MockClient {
        async fn verify(&self, token: &str) -> Result<PublicUser, SessionError> {
            self.verified_tokens.lock().unwrap().push(token.to_string());
            self.verify.clone()
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<LoginOutcome, SessionError> {
            self.login.clone()
        }

        async fn logout(&self) -> Result<(), SessionError> {
            Ok(())
        }
    }

    fn jar_with_session(token: &str) -> CookieJar {
        let mut jar = CookieJar::in_memory();
        jar.set(AUTH_COOKIE, token);
        jar.set(ROLE_COOKIE, "2");
        jar.set(USER_ID_COOKIE, "7");
        jar.set(FILIERE_COOKIE, "2");
        jar
    }

    #[tokio::test]
    async fn starts_loading_then_authenticates() {
        let mut ctx = AuthContext::new(MockClient::verifying(Ok(user(Role::Student, true))), jar_with_session("a.b.c"));
        assert_eq!(ctx.state(), &SessionState::Loading);

        ctx.init().await;
        let user = ctx.user().expect("authenticated");
        assert_eq!(user.role.code().to_string(), ctx.jar().get(ROLE_COOKIE).unwrap());
    }

    #[tokio::test]
    async fn unauthorized_clears_cookies() {
        let client = MockClient::verifying(Err(SessionError::Unauthorized("Session expirée".into())));
        let mut ctx = AuthContext::new(client, jar_with_session("a.b.c"));

        assert_eq!(ctx.init().await, &SessionState::Anonymous);
        assert_eq!(ctx.jar().get(AUTH_COOKIE), None);
        assert_eq!(ctx.jar().get(USER_ID_COOKIE), None);
    }

    #[tokio::test]
    async fn other_failures_fail_closed_but_keep_cookies() {
        let client = MockClient::verifying(Err(SessionError::Transport("connection refused".into())));
        let mut ctx = AuthContext::new(client, jar_with_session("a.b.c"));

        assert_eq!(ctx.init().await, &SessionState::Anonymous);
        assert_eq!(ctx.jar().get(AUTH_COOKIE), Some("a.b.c"));
    }

    #[tokio::test]
    async fn legacy_token_is_never_verified() {
        let mut ctx = AuthContext::new(MockClient::verifying(Ok(user(Role::Admin, true))), jar_with_session("opaque"));

        assert_eq!(ctx.init().await, &SessionState::Anonymous);
        assert!(ctx.client().verified_tokens.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_token_is_anonymous() {
        let mut ctx = AuthContext::new(MockClient::verifying(Ok(user(Role::Admin, true))), CookieJar::in_memory());
        assert_eq!(ctx.init().await, &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn login_sets_the_four_cookies() {
        let outcome = LoginOutcome { token: Some("x.y.z".into()), user: user(Role::Professor, true), set_cookies: vec![] };
        let mut ctx = AuthContext::new(MockClient::logging_in(Ok(outcome)), CookieJar::in_memory());

        let logged = ctx.login("sara@uni.ma", "secret").await.unwrap();
        assert_eq!(logged.role, Role::Professor);
        assert_eq!(ctx.jar().get(AUTH_COOKIE), Some("x.y.z"));
        assert_eq!(ctx.jar().get(ROLE_COOKIE), Some("0"));
        assert_eq!(ctx.jar().get(USER_ID_COOKIE), Some("7"));
        assert_eq!(ctx.jar().get(FILIERE_COOKIE), Some("2"));
    }

    #[tokio::test]
    async fn unactivated_student_is_refused_without_cookies() {
        let outcome = LoginOutcome { token: Some("x.y.z".into()), user: user(Role::Student, false), set_cookies: vec![] };
        let mut ctx = AuthContext::new(MockClient::logging_in(Ok(outcome)), CookieJar::in_memory());

        let err = ctx.login("sara@uni.ma", "secret").await.unwrap_err();
        assert_eq!(err, SessionError::NotActivated(MSG_NOT_ACTIVATED.to_string()));
        assert!(ctx.jar().cookie_header().is_none());
    }

    #[tokio::test]
    async fn response_without_token_is_refused() {
        let outcome = LoginOutcome { token: None, user: user(Role::Admin, true), set_cookies: vec![] };
        let mut ctx = AuthContext::new(MockClient::logging_in(Ok(outcome)), CookieJar::in_memory());

        assert_eq!(ctx.login("a@b.c", "secret").await.unwrap_err(), SessionError::MissingToken);
        assert!(ctx.jar().cookie_header().is_none());
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let mut ctx = AuthContext::new(MockClient::verifying(Ok(user(Role::Admin, true))), jar_with_session("a.b.c"));
        ctx.init().await;
        ctx.logout().await;

        assert_eq!(ctx.state(), &SessionState::Anonymous);
        assert!(ctx.jar().cookie_header().is_none());
    }

    #[test]
    fn legacy_detection() {
        assert!(is_legacy_token("abcdef"));
        assert!(is_legacy_token("a.b"));
        assert!(!is_legacy_token("a.b.c"));
    }
}
