use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, chef, prof, public, student};
use crate::state::AppState;

/// Full REST surface of the portal.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);
    let mut router = Router::new()
        .merge(public_routes())
        .merge(admin_routes())
        .merge(chef_routes())
        .merge(prof_routes())
        .merge(student_routes())
        .layer(cors);
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

/// `*` (or nothing) allows any origin without credentials; an explicit list
/// allows credentialed requests so the session cookies travel.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .route("/login", post(public::login_post))
        .route("/registerStudent", post(public::register_student_post))
        .route("/verify", get(public::verify_get))
        .route("/logout", post(public::logout_post))
        .route("/filiere", get(public::filiere_list).post(admin::filiere_post))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::users_list).post(admin::users_post))
        .route("/users/:id", put(admin::user_put).delete(admin::user_delete))
        .route("/filiere/:id", put(admin::filiere_put).delete(admin::filiere_delete))
}

fn chef_routes() -> Router<AppState> {
    // `:id` is the filière on GET and the entry on PUT/DELETE.
    Router::new()
        .route("/prof/:filiereId", get(chef::prof_list))
        .route("/stdListe", get(chef::students_list))
        .route("/stdListe/:filiereId", get(chef::students_list_by_filiere))
        .route("/validateStudent/:id", put(chef::validate_student_put))
        .route("/student/:id", delete(chef::student_delete))
        .route("/domaine", post(chef::domaine_post))
        .route("/domaine/:id", get(chef::domaine_list).put(chef::domaine_put).delete(chef::domaine_delete))
        .route("/prerequis", post(chef::prerequis_post))
        .route("/prerequis/:id", get(chef::prerequis_list).put(chef::prerequis_put).delete(chef::prerequis_delete))
        .route("/stats/dashboard/:filiereId", get(chef::dashboard_get))
        .route("/avancement/:pfeId", put(chef::avancement_put))
}

fn prof_routes() -> Router<AppState> {
    Router::new()
        .route("/myPfe/:profId", get(prof::my_pfe_list))
        .route("/newPfe", post(prof::new_pfe_post))
        .route("/updatePfe", put(prof::update_pfe_put))
        .route("/deletePfe/:id", delete(prof::pfe_delete))
        .route("/demandes/prof/:profId", get(prof::prof_demandes_list))
        .route("/affectPfe", put(prof::affect_pfe_put))
        .route("/deleteDemande/:id", delete(prof::demande_delete))
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/pfeListe/:filiereId", get(student::pfe_list))
        .route("/pfe/:id", get(student::pfe_get))
        .route("/addDemande", post(student::add_demande_post))
        .route("/myDemandes/:studentId", get(student::my_demandes_list))
}
