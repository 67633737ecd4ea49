use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::types::{DbId, Role};

const USER_COLUMNS: &str =
    "id, nom, prenom, email, password_hash, role, filiere_id, valid, cne, telephone, date_naissance, created_at";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub filiere_id: Option<DbId>,
    pub valid: bool,
    pub cne: Option<String>,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub filiere_id: Option<DbId>,
    pub telephone: Option<String>,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(email.trim()).fetch_optional(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: DbId) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY role, nom, prenom", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    /// Users of one role, optionally restricted to a filière.
    pub async fn list_by_role(&self, role: Role, filiere_id: Option<DbId>) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = $1 AND ($2::BIGINT IS NULL OR filiere_id = $2) ORDER BY nom, prenom",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(role.code()).bind(filiere_id).fetch_all(&self.pool).await?)
    }

    pub async fn count_by_role(&self, role: Role) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.code())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO users (nom, prenom, email, password_hash, role, filiere_id, valid, cne, telephone, date_naissance)
            VALUES ($1, $2, lower($3), $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.nom.trim())
            .bind(user.prenom.trim())
            .bind(user.email.trim())
            .bind(&user.password_hash)
            .bind(user.role.code())
            .bind(user.filiere_id)
            .bind(user.valid)
            .bind(&user.cne)
            .bind(&user.telephone)
            .bind(user.date_naissance)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Cet email est déjà utilisé"))
    }

    pub async fn update(&self, id: DbId, update: UserUpdate) -> Result<User, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE users SET
                nom = COALESCE($2, nom),
                prenom = COALESCE($3, prenom),
                email = COALESCE(lower($4), email),
                password_hash = COALESCE($5, password_hash),
                role = COALESCE($6, role),
                filiere_id = COALESCE($7, filiere_id),
                telephone = COALESCE($8, telephone)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(update.nom)
            .bind(update.prenom)
            .bind(update.email)
            .bind(update.password_hash)
            .bind(update.role.map(Role::code))
            .bind(update.filiere_id)
            .bind(update.telephone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Cet email est déjà utilisé"))?
            .ok_or_else(|| DatabaseError::NotFound("Utilisateur introuvable".to_string()))
    }

    /// Activate (or deactivate) a student account.
    pub async fn set_valid(&self, student_id: DbId, valid: bool) -> Result<User, DatabaseError> {
        let sql = format!("UPDATE users SET valid = $2 WHERE id = $1 AND role = $3 RETURNING {}", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(student_id)
            .bind(valid)
            .bind(Role::Student.code())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Étudiant introuvable".to_string()))
    }

    pub async fn delete(&self, id: DbId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Utilisateur introuvable".to_string()));
        }
        Ok(())
    }
}
