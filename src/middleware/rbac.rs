//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 when the session
//! role does not match. Admins also pass [`RequireDeptHead`].

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

async fn require(parts: &mut Parts, state: &AppState, allowed: &[Role]) -> Result<AuthUser, ApiError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role) {
        tracing::warn!(user_id = user.user_id, role = %user.role, "role not allowed for this route");
        return Err(ApiError::forbidden("Accès refusé"));
    }
    Ok(user)
}

macro_rules! role_extractor {
    ($(#[$doc:meta])* $name:ident, [$($role:expr),+]) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        #[async_trait]
        impl FromRequestParts<AppState> for $name {
            type Rejection = ApiError;

            async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
                require(parts, state, &[$($role),+]).await.map($name)
            }
        }
    };
}

role_extractor!(
    /// Requires the admin role.
    RequireAdmin,
    [Role::Admin]
);

role_extractor!(
    /// Requires a department head (or admin).
    RequireDeptHead,
    [Role::DeptHead, Role::Admin]
);

role_extractor!(
    /// Requires a professor.
    RequireProfessor,
    [Role::Professor]
);

role_extractor!(
    /// Requires a student.
    RequireStudent,
    [Role::Student]
);
