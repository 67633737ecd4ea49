use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization, Cookie, HeaderMapExt};

use crate::auth::{cookies::AUTH_COOKIE, jwt::validate_jwt_with_secret, Claims};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{DbId, Role};

/// Authenticated user context extracted from the session token.
///
/// The token is read from `Authorization: Bearer` first and from the `auth`
/// cookie otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    pub filiere_id: Option<DbId>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub, role: claims.role, filiere_id: claims.filiere }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Filière of the session; 403 for accounts without one.
    pub fn filiere(&self) -> Result<DbId, ApiError> {
        self.filiere_id.ok_or_else(|| ApiError::forbidden("Aucune filière associée à ce compte"))
    }

    /// Non-admins may only address their own filière.
    pub fn ensure_filiere(&self, filiere_id: DbId) -> Result<(), ApiError> {
        if self.is_admin() || self.filiere_id == Some(filiere_id) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Accès refusé à cette filière"))
        }
    }

    /// Filière targeted by a scoped write: admins name it explicitly, everyone
    /// else is pinned to their own.
    pub fn scope_filiere(&self, requested: Option<DbId>) -> Result<DbId, ApiError> {
        match (self.is_admin(), requested) {
            (true, Some(filiere_id)) => Ok(filiere_id),
            (true, None) => Err(ApiError::field_error("idFiliere", "Ce champ est obligatoire")),
            (false, Some(filiere_id)) => self.ensure_filiere(filiere_id).map(|_| filiere_id),
            (false, None) => self.filiere(),
        }
    }

    /// Non-admins may only address their own records.
    pub fn ensure_self(&self, user_id: DbId) -> Result<(), ApiError> {
        if self.is_admin() || self.user_id == user_id {
            Ok(())
        } else {
            Err(ApiError::forbidden("Accès refusé"))
        }
    }
}

/// Session token from the request headers, bearer header winning over the cookie.
pub fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() {
        let token = bearer.token().trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }
    parts
        .headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(AUTH_COOKIE).map(str::to_string))
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| ApiError::unauthorized("Authentification requise"))?;
        let claims = validate_jwt_with_secret(&token, state.jwt_secret())?;
        Ok(AuthUser::from(claims))
    }
}
