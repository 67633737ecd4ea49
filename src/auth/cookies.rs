use crate::config::SecurityConfig;
use crate::types::{DbId, Role};

pub const AUTH_COOKIE: &str = "auth";
pub const ROLE_COOKIE: &str = "role";
pub const USER_ID_COOKIE: &str = "userId";
pub const FILIERE_COOKIE: &str = "filId";

/// The four session cookies, always written and cleared together.
pub const SESSION_COOKIES: [&str; 4] = [AUTH_COOKIE, ROLE_COOKIE, USER_ID_COOKIE, FILIERE_COOKIE];

/// Session cookies live one day.
pub const SESSION_MAX_AGE_SECS: i64 = 86_400;

/// Attributes shared by every session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub max_age_secs: i64,
    pub secure: bool,
    pub same_site: &'static str,
    pub path: &'static str,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self { max_age_secs: SESSION_MAX_AGE_SECS, secure: true, same_site: "Strict", path: "/" }
    }
}

impl CookiePolicy {
    /// Cookie lifetime is fixed at one day; the token expiry is configured separately.
    pub fn from_security(security: &SecurityConfig) -> Self {
        Self {
            max_age_secs: SESSION_MAX_AGE_SECS,
            secure: security.cookie_secure,
            same_site: "Strict",
            path: "/",
        }
    }

    fn attributes(&self, max_age: i64, http_only: bool) -> String {
        let mut attrs = format!("Path={}; Max-Age={}; SameSite={}", self.path, max_age, self.same_site);
        if self.secure {
            attrs.push_str("; Secure");
        }
        if http_only {
            attrs.push_str("; HttpOnly");
        }
        attrs
    }

    pub fn set_cookie(&self, name: &str, value: &str) -> String {
        // Only the token is hidden from scripts; role/ids are read by the UI.
        format!("{}={}; {}", name, value, self.attributes(self.max_age_secs, name == AUTH_COOKIE))
    }

    pub fn clear_cookie(&self, name: &str) -> String {
        format!("{}=; {}", name, self.attributes(0, name == AUTH_COOKIE))
    }
}

/// Values written into the session cookies after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub token: String,
    pub role: Role,
    pub user_id: DbId,
    pub filiere_id: Option<DbId>,
}

impl SessionCookies {
    pub fn set_cookie_headers(&self, policy: &CookiePolicy) -> Vec<String> {
        let filiere = self.filiere_id.map(|f| f.to_string()).unwrap_or_default();
        vec![
            policy.set_cookie(AUTH_COOKIE, &self.token),
            policy.set_cookie(ROLE_COOKIE, &self.role.code().to_string()),
            policy.set_cookie(USER_ID_COOKIE, &self.user_id.to_string()),
            policy.set_cookie(FILIERE_COOKIE, &filiere),
        ]
    }
}

pub fn clear_cookie_headers(policy: &CookiePolicy) -> Vec<String> {
    SESSION_COOKIES.iter().map(|name| policy.clear_cookie(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CookiePolicy {
        CookiePolicy { max_age_secs: 86_400, secure: true, same_site: "Strict", path: "/" }
    }

    #[test]
    fn writes_all_four_cookies_with_shared_policy() {
        let cookies = SessionCookies { token: "abc.def.ghi".into(), role: Role::Student, user_id: 7, filiere_id: Some(2) };
        let headers = cookies.set_cookie_headers(&policy());
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[0], "auth=abc.def.ghi; Path=/; Max-Age=86400; SameSite=Strict; Secure; HttpOnly");
        assert_eq!(headers[1], "role=2; Path=/; Max-Age=86400; SameSite=Strict; Secure");
        assert!(headers[2].starts_with("userId=7;"));
        assert!(headers[3].starts_with("filId=2;"));
    }

    #[test]
    fn clearing_expires_immediately() {
        let headers = clear_cookie_headers(&policy());
        assert_eq!(headers.len(), 4);
        assert!(headers.iter().all(|h| h.contains("Max-Age=0")));
    }

    #[test]
    fn cookie_lifetime_ignores_token_expiry() {
        let security = SecurityConfig {
            cors_origins: vec![],
            jwt_secret: "secret".into(),
            session_expiry_hours: 1,
            cookie_secure: false,
            min_password_length: 8,
        };
        let policy = CookiePolicy::from_security(&security);
        assert_eq!(policy.max_age_secs, SESSION_MAX_AGE_SECS);
        assert!(!policy.secure);
        assert!(policy.set_cookie(ROLE_COOKIE, "3").contains("Max-Age=86400"));
    }
}
