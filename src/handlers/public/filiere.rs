// handlers/public/filiere.rs - GET /filiere

use axum::extract::{Query, State};
use serde_json::Value;

use crate::database::repository::FiliereRepository;
use crate::handlers::listing::list_response;
use crate::middleware::ApiResult;
use crate::state::AppState;
use crate::table::{columns, TableQuery};

/// GET /filiere - every filière; public because registration needs it
pub async fn filiere_list(State(state): State<AppState>, Query(query): Query<TableQuery>) -> ApiResult<Value> {
    let filieres = FiliereRepository::new(state.pool.clone()).list().await?;
    list_response(filieres, columns::catalog(), &query, &state.config.table)
}
