// handlers/public/login.rs - POST /login

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt::generate_jwt_with_secret, verify_password, Claims, SessionCookies};
use crate::database::{models::PublicUser, repository::UserRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const MSG_BAD_CREDENTIALS: &str = "Email ou mot de passe incorrect";
pub const MSG_NOT_ACTIVATED: &str = "Votre compte n'est pas encore activé";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// POST /login - verify credentials, issue the session token and cookies
///
/// Unknown email and wrong password share one 401 message. Students whose
/// account is not yet activated get a 403 and no cookies.
pub async fn login_post(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
    }

    let users = UserRepository::new(state.pool.clone());
    let user = match users.find_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
    }

    if !user.is_activated() {
        tracing::warn!(user_id = user.id, "Login refused for unactivated student");
        return Err(ApiError::forbidden(MSG_NOT_ACTIVATED));
    }

    let claims = Claims::with_expiry(user.id, user.role, user.filiere_id, state.config.security.session_expiry_hours);
    let token = generate_jwt_with_secret(&claims, state.jwt_secret())?;

    let cookies = SessionCookies { token: token.clone(), role: user.role, user_id: user.id, filiere_id: user.filiere_id }
        .set_cookie_headers(&state.cookie_policy());

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(ApiResponse::success(LoginResponse { token, user: user.into() }).with_cookies(cookies))
}
