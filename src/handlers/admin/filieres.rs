// handlers/admin/filieres.rs - POST /filiere, PUT/DELETE /filiere/:id

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::database::{models::Filiere, repository::FiliereRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequireAdmin};
use crate::state::AppState;
use crate::types::DbId;

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub nom: String,
}

impl NameRequest {
    pub fn checked(&self) -> Result<&str, ApiError> {
        let nom = self.nom.trim();
        if nom.is_empty() {
            return Err(ApiError::field_error("nom", "Ce champ est obligatoire"));
        }
        Ok(nom)
    }
}

pub async fn filiere_post(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<NameRequest>,
) -> ApiResult<Filiere> {
    let filiere = FiliereRepository::new(state.pool.clone()).create(payload.checked()?).await?;
    Ok(ApiResponse::created(filiere))
}

pub async fn filiere_put(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(payload): Json<NameRequest>,
) -> ApiResult<Filiere> {
    let filiere = FiliereRepository::new(state.pool.clone()).update(id, payload.checked()?).await?;
    Ok(ApiResponse::success(filiere))
}

/// Deleting a filière cascades to its domaines, prerequisites and projects.
pub async fn filiere_delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    FiliereRepository::new(state.pool.clone()).delete(id).await?;
    tracing::info!(admin_id = admin.user_id, filiere_id = id, "Filière deleted");
    Ok(ApiResponse::success(()))
}
