// handlers/student/demandes.rs - a student's applications

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::{models::Demande, repository::DemandeRepository};
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequireStudent};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::DbId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDemandeRequest {
    pub id_pfe: DbId,
}

/// POST /addDemande - apply to a project of the student's filière
///
/// 409 on a second demande for the same project or once the student has
/// been assigned.
pub async fn add_demande_post(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Json(payload): Json<AddDemandeRequest>,
) -> ApiResult<Demande> {
    let demande = DemandeRepository::new(state.pool.clone())
        .create(student.user_id, student.filiere()?, payload.id_pfe)
        .await?;
    tracing::info!(student_id = student.user_id, pfe_id = payload.id_pfe, "Demande filed");
    Ok(ApiResponse::created(demande))
}

/// GET /myDemandes/:studentId
pub async fn my_demandes_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    auth.ensure_self(student_id)?;
    let demandes = DemandeRepository::new(state.pool.clone()).list_by_student(student_id).await?;
    list_response(demandes, columns::demandes(), &query, &state.config.table)
}
