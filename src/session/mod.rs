//! Client-side authentication context.
//!
//! `AuthContext` turns the session cookies into a `SessionState`, verifying
//! the token once against the API. Role guards read that state.

pub mod client;
pub mod context;
pub mod guard;
pub mod jar;

pub use client::{AuthClient, LoginOutcome, SessionError};
pub use context::{is_legacy_token, AuthContext, SessionState};
pub use guard::{GuardDecision, RoleGuard};
pub use jar::CookieJar;
