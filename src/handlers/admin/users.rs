// handlers/admin/users.rs - /users and /users/:id

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{hash_password, password::validate_password_strength};
use crate::database::{
    models::PublicUser,
    repository::{NewUser, UserRepository, UserUpdate},
};
use crate::error::ApiError;
use crate::form::validate::is_valid_email;
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, RequireAdmin};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::{DbId, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub id_filiere: Option<DbId>,
    pub telephone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub id_filiere: Option<DbId>,
    pub telephone: Option<String>,
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email.trim()) {
        Ok(())
    } else {
        Err(ApiError::field_error("email", "Adresse email invalide"))
    }
}

fn check_password(state: &AppState, password: &str) -> Result<(), ApiError> {
    validate_password_strength(password, state.config.security.min_password_length)
        .map_err(|msg| ApiError::field_error("password", msg))
}

/// GET /users - every account
pub async fn users_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    let users: Vec<PublicUser> =
        UserRepository::new(state.pool.clone()).list_all().await?.into_iter().map(PublicUser::from).collect();
    list_response(users, columns::users(), &query, &state.config.table)
}

/// POST /users - create a staff account (professor, department head or admin)
///
/// Staff accounts are active immediately. Students register themselves.
pub async fn users_post(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<PublicUser> {
    if payload.role == Role::Student {
        return Err(ApiError::field_error("role", "Les étudiants s'inscrivent eux-mêmes"));
    }
    if payload.role != Role::Admin && payload.id_filiere.is_none() {
        return Err(ApiError::field_error("idFiliere", "Ce champ est obligatoire"));
    }
    if payload.nom.trim().is_empty() || payload.prenom.trim().is_empty() {
        return Err(ApiError::validation_error("Nom et prénom sont obligatoires", None));
    }
    check_email(&payload.email)?;
    check_password(&state, &payload.password)?;

    let user = UserRepository::new(state.pool.clone())
        .create(NewUser {
            nom: payload.nom,
            prenom: payload.prenom,
            email: payload.email,
            password_hash: hash_password(&payload.password)?,
            role: payload.role,
            filiere_id: payload.id_filiere.filter(|_| payload.role != Role::Admin),
            valid: true,
            cne: None,
            telephone: payload.telephone,
            date_naissance: None,
        })
        .await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = %user.role, "User created");
    Ok(ApiResponse::created(user.into()))
}

/// PUT /users/:id - partial update; a new password is re-hashed
pub async fn user_put(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<PublicUser> {
    if let Some(email) = &payload.email {
        check_email(email)?;
    }
    let password_hash = match payload.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            check_password(&state, password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = UserRepository::new(state.pool.clone())
        .update(
            id,
            UserUpdate {
                nom: payload.nom,
                prenom: payload.prenom,
                email: payload.email,
                password_hash,
                role: payload.role,
                filiere_id: payload.id_filiere,
                telephone: payload.telephone,
            },
        )
        .await?;
    Ok(ApiResponse::success(user.into()))
}

/// DELETE /users/:id - an admin cannot delete their own account
pub async fn user_delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    if id == admin.user_id {
        return Err(ApiError::bad_request("Vous ne pouvez pas supprimer votre propre compte"));
    }
    UserRepository::new(state.pool.clone()).delete(id).await?;
    tracing::info!(admin_id = admin.user_id, user_id = id, "User deleted");
    Ok(ApiResponse::success(()))
}
