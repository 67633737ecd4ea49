// handlers/chef/catalog.rs - /domaine and /prerequis reference lists

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow};

use crate::database::{
    models::{Domaine, Prerequisite},
    repository::CatalogRepository,
};
use crate::error::ApiError;
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequireDeptHead};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::DbId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRequest {
    pub nom: String,
    /// Only read for admins; department heads always write to their own filière
    pub id_filiere: Option<DbId>,
}

impl CatalogRequest {
    fn nom(&self) -> Result<&str, ApiError> {
        let nom = self.nom.trim();
        if nom.is_empty() {
            return Err(ApiError::field_error("nom", "Ce champ est obligatoire"));
        }
        Ok(nom)
    }
}

trait CatalogRow: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize {}
impl<T> CatalogRow for T where T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize {}

async fn list<T: CatalogRow>(
    repo: CatalogRepository<T>,
    state: &AppState,
    auth: &AuthUser,
    filiere_id: DbId,
    query: &TableQuery,
) -> ApiResult<Value> {
    auth.ensure_filiere(filiere_id)?;
    let items = repo.list_by_filiere(filiere_id).await?;
    list_response(items, columns::catalog(), query, &state.config.table)
}

async fn create<T: CatalogRow>(repo: CatalogRepository<T>, chef: &AuthUser, payload: &CatalogRequest) -> ApiResult<T> {
    let filiere_id = chef.scope_filiere(payload.id_filiere)?;
    Ok(ApiResponse::created(repo.create(payload.nom()?, filiere_id).await?))
}

/// Filière the entry lives in, after checking the caller may touch it.
async fn owned_filiere<T: CatalogRow>(repo: &CatalogRepository<T>, chef: &AuthUser, id: DbId) -> Result<DbId, ApiError> {
    let filiere_id = repo.filiere_of(id).await?;
    chef.ensure_filiere(filiere_id)?;
    Ok(filiere_id)
}

async fn update<T: CatalogRow>(
    repo: CatalogRepository<T>,
    chef: &AuthUser,
    id: DbId,
    payload: &CatalogRequest,
) -> ApiResult<T> {
    let nom = payload.nom()?;
    let filiere_id = owned_filiere(&repo, chef, id).await?;
    Ok(ApiResponse::success(repo.update(id, nom, filiere_id).await?))
}

async fn delete<T: CatalogRow>(repo: CatalogRepository<T>, chef: &AuthUser, id: DbId) -> ApiResult<()> {
    let filiere_id = owned_filiere(&repo, chef, id).await?;
    repo.delete(id, filiere_id).await?;
    Ok(ApiResponse::success(()))
}

/// GET /domaine/:filiereId
pub async fn domaine_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filiere_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    list(CatalogRepository::domaines(state.pool.clone()), &state, &auth, filiere_id, &query).await
}

/// POST /domaine
pub async fn domaine_post(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Json(payload): Json<CatalogRequest>,
) -> ApiResult<Domaine> {
    create(CatalogRepository::domaines(state.pool.clone()), &chef, &payload).await
}

/// PUT /domaine/:id
pub async fn domaine_put(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
    Json(payload): Json<CatalogRequest>,
) -> ApiResult<Domaine> {
    update(CatalogRepository::domaines(state.pool.clone()), &chef, id, &payload).await
}

/// DELETE /domaine/:id - projects of the domaine keep existing without one
pub async fn domaine_delete(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    delete(CatalogRepository::domaines(state.pool.clone()), &chef, id).await
}

/// GET /prerequis/:filiereId
pub async fn prerequis_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filiere_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    list(CatalogRepository::prerequisites(state.pool.clone()), &state, &auth, filiere_id, &query).await
}

/// POST /prerequis
pub async fn prerequis_post(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Json(payload): Json<CatalogRequest>,
) -> ApiResult<Prerequisite> {
    create(CatalogRepository::prerequisites(state.pool.clone()), &chef, &payload).await
}

/// PUT /prerequis/:id
pub async fn prerequis_put(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
    Json(payload): Json<CatalogRequest>,
) -> ApiResult<Prerequisite> {
    update(CatalogRepository::prerequisites(state.pool.clone()), &chef, id, &payload).await
}

/// DELETE /prerequis/:id - also unlinks it from every project
pub async fn prerequis_delete(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    delete(CatalogRepository::prerequisites(state.pool.clone()), &chef, id).await
}
