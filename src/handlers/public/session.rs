// handlers/public/session.rs - GET /verify and POST /logout

use axum::extract::State;

use crate::auth::cookies::clear_cookie_headers;
use crate::database::{models::PublicUser, repository::UserRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /verify - validate the session token and return the current user
///
/// 401 when the token is missing, invalid or expired, or when the account
/// disappeared or was deactivated since the token was issued.
pub async fn verify_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<PublicUser> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(auth.user_id)
        .await?
        .filter(|user| user.is_activated())
        .ok_or_else(|| ApiError::unauthorized("Session invalide"))?;
    Ok(ApiResponse::success(user.into()))
}

/// POST /logout - expire the four session cookies
pub async fn logout_post(State(state): State<AppState>) -> ApiResult<()> {
    Ok(ApiResponse::success(()).with_cookies(clear_cookie_headers(&state.cookie_policy())))
}
