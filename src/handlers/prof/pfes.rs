// handlers/prof/pfes.rs - a professor's own projects

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::database::{
    models::{Pfe, PfeDetail},
    repository::{CatalogRepository, PfeInput, PfeRepository},
};
use crate::error::ApiError;
use crate::form::{field_map_from_json, schemas::pfe_proposal, FieldMap, MultiStepForm, SelectOption};
use crate::handlers::listing::list_response;
use crate::handlers::public::register::{id_value, text_value};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequireProfessor};
use crate::state::AppState;
use crate::table::{columns, TableQuery};
use crate::types::DbId;

/// Defense dates further than this are rejected.
const DEFENSE_HORIZON_DAYS: i64 = 730;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PfeExtras {
    #[serde(default)]
    id_prerequisites: Vec<DbId>,
}

/// Validates a proposal body against the proposal form and the domaines of
/// the professor's filière.
async fn proposal_input(state: &AppState, filiere_id: DbId, body: &Value) -> Result<PfeInput, ApiError> {
    let domaines = CatalogRepository::domaines(state.pool.clone()).list_by_filiere(filiere_id).await?;
    let options = domaines.iter().map(|d| SelectOption::new(d.id.to_string(), d.nom.clone())).collect();
    let latest_defense = Utc::now().date_naive() + Duration::days(DEFENSE_HORIZON_DAYS);

    let mut form = MultiStepForm::new(pfe_proposal(options, latest_defense)).with_values(field_map_from_json(body));
    let values = form.validate_all()?;

    let extras: PfeExtras = serde_json::from_value(body.clone())
        .map_err(|_| ApiError::field_error("idPrerequisites", "Liste de prérequis invalide"))?;

    Ok(PfeInput {
        titre: text_value(values, "titre").unwrap_or_default(),
        description: text_value(values, "description").unwrap_or_default(),
        domaine_id: id_value(values, "idDomaine")?,
        nbr_etd: student_count(values)?,
        date_soutenance: text_value(values, "dateSoutenance")
            .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()),
        prerequisite_ids: extras.id_prerequisites,
    })
}

/// `nbrEtd` must be a whole number of students; `2` and `2.0` pass, `1.5` does not.
fn student_count(values: &FieldMap) -> Result<i32, ApiError> {
    let raw = text_value(values, "nbrEtd").ok_or_else(|| ApiError::field_error("nbrEtd", "Ce champ est obligatoire"))?;
    match raw.parse::<f64>() {
        Ok(n) if n >= 1.0 && n.fract() == 0.0 && n <= i32::MAX as f64 => Ok(n as i32),
        _ => Err(ApiError::field_error("nbrEtd", "Veuillez saisir un nombre entier positif")),
    }
}

/// The `id` of an update body, as a number or a numeric string.
fn body_id(body: &Value) -> Result<DbId, ApiError> {
    id_value(&field_map_from_json(body), "id")?.ok_or_else(|| ApiError::field_error("id", "Ce champ est obligatoire"))
}

/// GET /myPfe/:profId - projects supervised by the professor
pub async fn my_pfe_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(prof_id): Path<DbId>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Value> {
    auth.ensure_self(prof_id)?;
    let pfes: Vec<PfeDetail> = PfeRepository::new(state.pool.clone()).list_by_prof(prof_id).await?;
    list_response(pfes, columns::pfes(), &query, &state.config.table)
}

/// POST /newPfe - propose a project with its prerequisites
///
/// The project row and its `pfe_prerequis` links are written in one
/// transaction.
pub async fn new_pfe_post(
    State(state): State<AppState>,
    RequireProfessor(prof): RequireProfessor,
    Json(body): Json<Value>,
) -> ApiResult<PfeDetail> {
    let filiere_id = prof.filiere()?;
    let input = proposal_input(&state, filiere_id, &body).await?;

    let pfes = PfeRepository::new(state.pool.clone());
    let pfe = pfes.create(prof.user_id, filiere_id, input).await?;
    tracing::info!(prof_id = prof.user_id, pfe_id = pfe.id, "PFE proposed");
    Ok(ApiResponse::created(pfes.find_detail(pfe.id).await?))
}

/// PUT /updatePfe - edit an owned project; `id` travels in the body
pub async fn update_pfe_put(
    State(state): State<AppState>,
    RequireProfessor(prof): RequireProfessor,
    Json(body): Json<Value>,
) -> ApiResult<PfeDetail> {
    let id = body_id(&body)?;
    let input = proposal_input(&state, prof.filiere()?, &body).await?;

    let pfes = PfeRepository::new(state.pool.clone());
    let pfe: Pfe = pfes.update(id, prof.user_id, input).await?;
    Ok(ApiResponse::success(pfes.find_detail(pfe.id).await?))
}

/// DELETE /deletePfe/:id - own projects only
pub async fn pfe_delete(
    State(state): State<AppState>,
    RequireProfessor(prof): RequireProfessor,
    Path(id): Path<DbId>,
) -> ApiResult<()> {
    PfeRepository::new(state.pool.clone()).delete(id, prof.user_id).await?;
    tracing::info!(prof_id = prof.user_id, pfe_id = id, "PFE deleted");
    Ok(ApiResponse::success(()))
}
