// handlers/chef/avancement.rs - PUT /avancement/:pfeId

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::database::{models::Pfe, repository::PfeRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequireDeptHead};
use crate::state::AppState;
use crate::types::{Avancement, DbId};

#[derive(Debug, Deserialize)]
pub struct AvancementRequest {
    pub avancement: Avancement,
}

/// Moves a project of the head's filière to another progress state.
pub async fn avancement_put(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(pfe_id): Path<DbId>,
    Json(payload): Json<AvancementRequest>,
) -> ApiResult<Pfe> {
    let pfes = PfeRepository::new(state.pool.clone());
    let current = pfes.find(pfe_id).await?.ok_or_else(|| ApiError::not_found("PFE introuvable"))?;
    chef.ensure_filiere(current.filiere_id)?;

    let pfe = pfes.set_avancement(pfe_id, current.filiere_id, payload.avancement).await?;
    tracing::info!(chef_id = chef.user_id, pfe_id, avancement = %pfe.avancement, "PFE progress updated");
    Ok(ApiResponse::success(pfe))
}
