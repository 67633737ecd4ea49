// handlers/chef/stats.rs - GET /stats/dashboard/:filiereId

use axum::extract::{Path, State};

use crate::database::repository::{DashboardStats, StatsRepository};
use crate::middleware::{ApiResponse, ApiResult, RequireDeptHead};
use crate::state::AppState;
use crate::types::DbId;

pub async fn dashboard_get(
    State(state): State<AppState>,
    RequireDeptHead(chef): RequireDeptHead,
    Path(filiere_id): Path<DbId>,
) -> ApiResult<DashboardStats> {
    chef.ensure_filiere(filiere_id)?;
    let stats = StatsRepository::new(state.pool.clone()).dashboard(filiere_id).await?;
    Ok(ApiResponse::success(stats))
}
