use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::CookiePolicy;
use crate::config::AppConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the configuration are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self { pool, config: Arc::new(config) }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.security.jwt_secret
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::from_security(&self.config.security)
    }
}
