// handlers/student/pfes.rs - project catalogue of a filière

use axum::extract::{Path, Query, State};
use serde_json::Value;

use crate::database::{models::PfeDetail, repository::PfeRepository};
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::DbId;

/// GET /pfeListe/:filiereId - projects of the filière with their prerequisites
///
/// Used by students to pick projects and by department heads to follow them.
pub async fn pfe_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filiere_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    auth.ensure_filiere(filiere_id)?;
    let pfes = PfeRepository::new(state.pool.clone()).list_by_filiere(filiere_id).await?;
    list_response(pfes, columns::pfes(), &query, &state.config.table)
}

/// GET /pfe/:id
pub async fn pfe_get(State(state): State<AppState>, auth: AuthUser, Path(id): Path<DbId>) -> ApiResult<PfeDetail> {
    let pfe = PfeRepository::new(state.pool.clone()).find_detail(id).await?;
    auth.ensure_filiere(pfe.pfe.filiere_id)?;
    Ok(ApiResponse::success(pfe))
}
