// handlers/public/root.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - service description and route map
pub async fn root_get() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "PFE Portal API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Gestion des projets de fin d'études",
            "endpoints": {
                "public": "/login, /registerStudent, /verify, /logout, /filiere",
                "admin": "/users[/:id], /filiere/:id",
                "chef": "/prof/:filiereId, /stdListe[/:filiereId], /validateStudent/:id, /student/:id, /domaine, /prerequis, /stats/dashboard/:filiereId, /avancement/:pfeId",
                "prof": "/myPfe/:profId, /newPfe, /updatePfe, /deletePfe/:id, /demandes/prof/:profId, /affectPfe, /deleteDemande/:id",
                "student": "/pfeListe/:filiereId, /pfe/:id, /addDemande, /myDemandes/:studentId, /deleteDemande/:id",
            }
        }
    }))
}

/// GET /health - database reachability
pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
