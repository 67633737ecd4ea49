// handlers/prof/demandes.rs - applications to a professor's projects

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::{models::Demande, repository::DemandeRepository};
use crate::error::ApiError;
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequireProfessor};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::{DbId, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectRequest {
    pub id_demande: DbId,
}

/// GET /demandes/prof/:profId - pending and accepted demandes, pending first
pub async fn prof_demandes_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(prof_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    auth.ensure_self(prof_id)?;
    let demandes = DemandeRepository::new(state.pool.clone()).list_by_prof(prof_id).await?;
    list_response(demandes, columns::demandes(), &query, &state.config.table)
}

/// PUT /affectPfe - accept a demande
///
/// Runs in one transaction: capacity check, `dispo = false`, and removal of
/// the student's other pending demandes. 409 when the project is full.
pub async fn affect_pfe_put(
    State(state): State<AppState>,
    RequireProfessor(prof): RequireProfessor,
    Json(payload): Json<AffectRequest>,
) -> ApiResult<Demande> {
    let demande = DemandeRepository::new(state.pool.clone()).accept(payload.id_demande, prof.user_id).await?;
    Ok(ApiResponse::success(demande))
}

/// DELETE /deleteDemande/:id
///
/// Professors refuse (or withdraw) demandes on their projects; students
/// withdraw their own while still pending.
pub async fn demande_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    let demandes = DemandeRepository::new(state.pool.clone());
    match auth.role {
        Role::Professor => demandes.delete_for_prof(id, auth.user_id).await?,
        Role::Student => demandes.delete_pending_for_student(id, auth.user_id).await?,
        _ => return Err(ApiError::forbidden("Accès refusé")),
    }
    tracing::info!(user_id = auth.user_id, demande_id = id, "Demande deleted");
    Ok(ApiResponse::success(()))
}
