// Handler behaviour against a live Postgres; set TEST_DATABASE_URL to run.

mod common;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use pfe_portal::auth::{hash_password, jwt::generate_jwt_with_secret, Claims};
use pfe_portal::routes::app;
use pfe_portal::state::AppState;
use pfe_portal::types::{DbId, Role};

const PASSWORD: &str = "motdepasse42";

/// One filière with a professor, a domaine and two prerequisites, plus a
/// prerequisite that belongs to another filière.
struct Fixture {
    state: AppState,
    filiere: DbId,
    prof: DbId,
    domaine: DbId,
    prerequisites: [DbId; 2],
    foreign_prerequisite: DbId,
}

impl Fixture {
    async fn new() -> Option<Self> {
        let state = common::database_state().await?;
        let pool = &state.pool;
        let tag = Uuid::new_v4().simple().to_string();

        let filiere = insert_filiere(pool, &format!("GI {}", tag)).await;
        let other = insert_filiere(pool, &format!("GC {}", tag)).await;
        let prof = insert_user(pool, Role::Professor, filiere, true).await;
        let domaine = insert_named(pool, "domaines", "Réseaux", filiere).await;
        let prerequisites = [
            insert_named(pool, "prerequis", "Rust", filiere).await,
            insert_named(pool, "prerequis", "SQL", filiere).await,
        ];
        let foreign_prerequisite = insert_named(pool, "prerequis", "Béton armé", other).await;

        Some(Self { state, filiere, prof, domaine, prerequisites, foreign_prerequisite })
    }

    fn token(&self, user_id: DbId, role: Role) -> String {
        let claims = Claims::with_expiry(user_id, role, Some(self.filiere), 1);
        generate_jwt_with_secret(&claims, common::TEST_JWT_SECRET).unwrap()
    }

    async fn student(&self, valid: bool) -> DbId {
        insert_user(&self.state.pool, Role::Student, self.filiere, valid).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Proposes a project as the fixture professor and returns its id.
    async fn propose(&self, titre: &str, nbr_etd: i32, prerequisites: &[DbId]) -> DbId {
        let token = self.token(self.prof, Role::Professor);
        let proposal = self.proposal(titre, nbr_etd, prerequisites);
        let (status, _, body) = self.send(Method::POST, "/newPfe", Some(&token), Some(proposal)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    fn proposal(&self, titre: &str, nbr_etd: i32, prerequisites: &[DbId]) -> Value {
        json!({
            "titre": titre,
            "description": "Plateforme de suivi des projets de fin d'études",
            "idDomaine": self.domaine,
            "nbrEtd": nbr_etd,
            "idPrerequisites": prerequisites,
        })
    }

    /// Files a demande as `student` and returns its id.
    async fn apply(&self, student: DbId, pfe: DbId) -> DbId {
        let token = self.token(student, Role::Student);
        let body = json!({ "idPfe": pfe });
        let (status, _, body) = self.send(Method::POST, "/addDemande", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    async fn accept(&self, demande: DbId) -> (StatusCode, Value) {
        let token = self.token(self.prof, Role::Professor);
        let body = json!({ "idDemande": demande });
        let (status, _, body) = self.send(Method::PUT, "/affectPfe", Some(&token), Some(body)).await;
        (status, body)
    }

    async fn linked_prerequisites(&self, pfe: DbId) -> Vec<DbId> {
        sqlx::query_scalar("SELECT prerequis_id FROM pfe_prerequis WHERE pfe_id = $1 ORDER BY prerequis_id")
            .bind(pfe)
            .fetch_all(&self.state.pool)
            .await
            .unwrap()
    }
}

async fn insert_filiere(pool: &PgPool, nom: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO filieres (nom) VALUES ($1) RETURNING id").bind(nom).fetch_one(pool).await.unwrap()
}

async fn insert_named(pool: &PgPool, table: &str, nom: &str, filiere: DbId) -> DbId {
    let sql = format!("INSERT INTO {} (nom, filiere_id) VALUES ($1, $2) RETURNING id", table);
    sqlx::query_scalar(&sql).bind(nom).bind(filiere).fetch_one(pool).await.unwrap()
}

async fn insert_user(pool: &PgPool, role: Role, filiere: DbId, valid: bool) -> DbId {
    let email = format!("{}@uni.test", Uuid::new_v4().simple());
    sqlx::query_scalar(
        r#"
        INSERT INTO users (nom, prenom, email, password_hash, role, filiere_id, valid)
        VALUES ('Alami', 'Sara', $1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(hash_password(PASSWORD).unwrap())
    .bind(role.code())
    .bind(filiere)
    .bind(valid)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn unactivated_student_login_is_403_without_cookies() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let student = fx.student(false).await;
    let email: String = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
        .bind(student)
        .fetch_one(&fx.state.pool)
        .await
        .unwrap();

    let (status, headers, body) =
        fx.send(Method::POST, "/login", None, Some(json!({ "email": email, "password": PASSWORD }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Votre compte n'est pas encore activé");
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn new_pfe_links_each_prerequisite_once() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let pfe = fx.propose("Portail PFE", 2, &fx.prerequisites).await;

    let mut expected = fx.prerequisites.to_vec();
    expected.sort_unstable();
    assert_eq!(fx.linked_prerequisites(pfe).await, expected);
}

#[tokio::test]
async fn update_with_foreign_prerequisite_changes_nothing() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let pfe = fx.propose("Titre d'origine", 1, &fx.prerequisites[..1]).await;

    let mut body = fx.proposal("Titre modifié", 1, &[fx.prerequisites[1], fx.foreign_prerequisite]);
    body["id"] = json!(pfe);
    let token = fx.token(fx.prof, Role::Professor);
    let (status, _, reply) = fx.send(Method::PUT, "/updatePfe", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(reply["error"], "Prérequis introuvable dans cette filière");

    let titre: String = sqlx::query_scalar("SELECT titre FROM pfes WHERE id = $1")
        .bind(pfe)
        .fetch_one(&fx.state.pool)
        .await
        .unwrap();
    assert_eq!(titre, "Titre d'origine");
    assert_eq!(fx.linked_prerequisites(pfe).await, vec![fx.prerequisites[0]]);
}

#[tokio::test]
async fn update_accepts_a_string_id() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let pfe = fx.propose("Avant", 1, &[]).await;

    let mut body = fx.proposal("Après", 1, &[]);
    body["id"] = json!(pfe.to_string());
    let token = fx.token(fx.prof, Role::Professor);
    let (status, _, reply) = fx.send(Method::PUT, "/updatePfe", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{}", reply);
    assert_eq!(reply["data"]["titre"], "Après");
}

#[tokio::test]
async fn fractional_student_count_is_rejected() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let mut body = fx.proposal("Demi-étudiant", 1, &[]);
    body["nbrEtd"] = json!(1.5);
    let token = fx.token(fx.prof, Role::Professor);
    let (status, _, reply) = fx.send(Method::POST, "/newPfe", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(reply["field_errors"]["nbrEtd"].is_string());
}

#[tokio::test]
async fn accepting_drops_other_pending_demandes_and_respects_capacity() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let full = fx.propose("Un seul étudiant", 1, &[]).await;
    let other = fx.propose("Autre sujet", 1, &[]).await;
    let first = fx.student(true).await;
    let second = fx.student(true).await;

    let accepted = fx.apply(first, full).await;
    fx.apply(first, other).await;
    let waiting = fx.apply(second, full).await;

    let (status, body) = fx.accept(accepted).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["dispo"], false);

    let remaining: Vec<DbId> = sqlx::query_scalar("SELECT id FROM demandes WHERE student_id = $1")
        .bind(first)
        .fetch_all(&fx.state.pool)
        .await
        .unwrap();
    assert_eq!(remaining, vec![accepted]);

    let (status, body) = fx.accept(waiting).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Ce PFE est complet");
}

#[tokio::test]
async fn concurrent_accepts_for_one_student_conflict_cleanly() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let a = fx.propose("Sujet A", 1, &[]).await;
    let b = fx.propose("Sujet B", 1, &[]).await;
    let student = fx.student(true).await;
    let on_a = fx.apply(student, a).await;
    let on_b = fx.apply(student, b).await;

    let ((first, _), (second, _)) = tokio::join!(fx.accept(on_a), fx.accept(on_b));
    let mut statuses = vec![first, second];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let assigned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM demandes WHERE student_id = $1 AND NOT dispo")
        .bind(student)
        .fetch_one(&fx.state.pool)
        .await
        .unwrap();
    assert_eq!(assigned, 1);
}

#[tokio::test]
async fn capacity_cannot_shrink_below_assigned_students() {
    let Some(fx) = Fixture::new().await else {
        return;
    };
    let pfe = fx.propose("Binôme", 2, &[]).await;
    for _ in 0..2 {
        let student = fx.student(true).await;
        let demande = fx.apply(student, pfe).await;
        assert_eq!(fx.accept(demande).await.0, StatusCode::OK);
    }

    let mut body = fx.proposal("Binôme", 1, &[]);
    body["id"] = json!(pfe);
    let token = fx.token(fx.prof, Role::Professor);
    let (status, _, _) = fx.send(Method::PUT, "/updatePfe", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let nbr_etd: i32 = sqlx::query_scalar("SELECT nbr_etd FROM pfes WHERE id = $1")
        .bind(pfe)
        .fetch_one(&fx.state.pool)
        .await
        .unwrap();
    assert_eq!(nbr_etd, 2);
}
