// handlers/chef/students.rs - professor and student rosters, student activation

use axum::extract::{Path, Query, State};
use serde_json::Value;

use crate::database::{
    models::{PublicUser, User},
    repository::UserRepository,
};
use crate::error::ApiError;
use crate::handlers::listing::list_response;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequireDeptHead};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::{DbId, Role};

async fn roster(state: &AppState, role: Role, filiere_id: DbId) -> Result<Vec<PublicUser>, ApiError> {
    let users = UserRepository::new(state.pool.clone()).list_by_role(role, Some(filiere_id)).await?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}

/// Loads a student the caller is allowed to manage.
async fn managed_student(state: &AppState, chef: &AuthUser, id: DbId) -> Result<User, ApiError> {
    let student = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .filter(|u| u.role == Role::Student)
        .ok_or_else(|| ApiError::not_found("Étudiant introuvable"))?;
    match student.filiere_id {
        Some(filiere_id) => chef.ensure_filiere(filiere_id)?,
        None if chef.is_admin() => {}
        None => return Err(ApiError::forbidden("Accès refusé à cette filière")),
    }
    Ok(student)
}

/// GET /prof/:filiereId - professors of a filière
///
/// Open to every role of that filière; students and professors use it to
/// browse supervisors.
pub async fn prof_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(filiere_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    auth.ensure_filiere(filiere_id)?;
    let profs = roster(&state, Role::Professor, filiere_id).await?;
    list_response(profs, columns::professors(), &query, &state.config.table)
}

/// GET /stdListe - students of the head's own filière
pub async fn students_list(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    let students = roster(&state, Role::Student, chef.filiere()?).await?;
    list_response(students, columns::students(), &query, &state.config.table)
}

/// GET /stdListe/:filiereId
pub async fn students_list_by_filiere(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(filiere_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    chef.ensure_filiere(filiere_id)?;
    let students = roster(&state, Role::Student, filiere_id).await?;
    list_response(students, columns::students(), &query, &state.config.table)
}

/// PUT /validateStudent/:id - activate a student account
pub async fn validate_student_put(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
) -> ApiResult<PublicUser> {
    managed_student(&state, &chef, id).await?;
    let student = UserRepository::new(state.pool.clone()).set_valid(id, true).await?;
    tracing::info!(chef_id = chef.user_id, student_id = id, "Student activated");
    Ok(ApiResponse::success(student.into()))
}

/// DELETE /student/:id
pub async fn student_delete(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    managed_student(&state, &chef, id).await?;
    UserRepository::new(state.pool.clone()).delete(id).await?;
    tracing::info!(chef_id = chef.user_id, student_id = id, "Student deleted");
    Ok(ApiResponse::success(()))
}
