use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{Demande, DemandeDetail};
use crate::types::DbId;

const DEMANDE_COLUMNS: &str = "id, pfe_id, student_id, prof_id, dispo, created_at";

const DETAIL_SELECT: &str = r#"
    SELECT a.id, a.pfe_id, a.student_id, a.prof_id, a.dispo, a.created_at,
           p.titre AS pfe_titre,
           (s.nom || ' ' || s.prenom) AS student_nom,
           s.email AS student_email,
           (t.nom || ' ' || t.prenom) AS prof_nom
    FROM demandes a
    JOIN pfes p ON p.id = a.pfe_id
    JOIN users s ON s.id = a.student_id
    JOIN users t ON t.id = a.prof_id
"#;

pub struct DemandeRepository {
    pool: PgPool,
}

impl DemandeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_prof(&self, prof_id: DbId) -> Result<Vec<DemandeDetail>, DatabaseError> {
        let sql = format!("{} WHERE a.prof_id = $1 ORDER BY a.dispo DESC, a.created_at DESC", DETAIL_SELECT);
        Ok(sqlx::query_as::<_, DemandeDetail>(&sql).bind(prof_id).fetch_all(&self.pool).await?)
    }

    pub async fn list_by_student(&self, student_id: DbId) -> Result<Vec<DemandeDetail>, DatabaseError> {
        let sql = format!("{} WHERE a.student_id = $1 ORDER BY a.created_at DESC", DETAIL_SELECT);
        Ok(sqlx::query_as::<_, DemandeDetail>(&sql).bind(student_id).fetch_all(&self.pool).await?)
    }

    /// Files a pending demande for a project of the student's own filière.
    pub async fn create(&self, student_id: DbId, filiere_id: DbId, pfe_id: DbId) -> Result<Demande, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let assigned: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM demandes WHERE student_id = $1 AND dispo = FALSE)")
                .bind(student_id)
                .fetch_one(&mut *tx)
                .await?;
        if assigned.0 {
            return Err(DatabaseError::Conflict("Vous êtes déjà affecté à un PFE".to_string()));
        }

        let sql = format!(
            r#"
            INSERT INTO demandes (pfe_id, student_id, prof_id)
            SELECT p.id, $2, p.prof_id FROM pfes p WHERE p.id = $1 AND p.filiere_id = $3
            RETURNING {}
            "#,
            DEMANDE_COLUMNS
        );
        let demande = sqlx::query_as::<_, Demande>(&sql)
            .bind(pfe_id)
            .bind(student_id)
            .bind(filiere_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Vous avez déjà postulé à ce PFE"))?
            .ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))?;

        tx.commit().await?;
        Ok(demande)
    }

    /// Accepts a demande addressed to `prof_id`.
    ///
    /// Locks the student, then the demande and its project, checks the project
    /// capacity, marks the demande assigned and drops the student's other
    /// pending demandes.
    pub async fn accept(&self, demande_id: DbId, prof_id: DbId) -> Result<Demande, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let student: (DbId,) = sqlx::query_as("SELECT student_id FROM demandes WHERE id = $1 AND prof_id = $2")
            .bind(demande_id)
            .bind(prof_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Demande introuvable".to_string()))?;

        // Accepts for one student run one at a time: each deletes the others' demandes.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(student.0)
            .execute(&mut *tx)
            .await?;

        let already: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM demandes WHERE student_id = $1 AND dispo = FALSE AND id <> $2)",
        )
        .bind(student.0)
        .bind(demande_id)
        .fetch_one(&mut *tx)
        .await?;
        if already.0 {
            return Err(DatabaseError::Conflict("Étudiant déjà affecté à un PFE".to_string()));
        }

        let sql = format!("SELECT {} FROM demandes WHERE id = $1 AND prof_id = $2 FOR UPDATE", DEMANDE_COLUMNS);
        let demande = sqlx::query_as::<_, Demande>(&sql)
            .bind(demande_id)
            .bind(prof_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Demande introuvable".to_string()))?;
        if !demande.is_pending() {
            return Err(DatabaseError::Conflict("Demande déjà acceptée".to_string()));
        }

        let capacity: (i32,) = sqlx::query_as("SELECT nbr_etd FROM pfes WHERE id = $1 FOR UPDATE")
            .bind(demande.pfe_id)
            .fetch_one(&mut *tx)
            .await?;
        let accepted: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM demandes WHERE pfe_id = $1 AND dispo = FALSE")
            .bind(demande.pfe_id)
            .fetch_one(&mut *tx)
            .await?;
        if accepted.0 >= capacity.0 as i64 {
            return Err(DatabaseError::Conflict("Ce PFE est complet".to_string()));
        }

        let sql = format!("UPDATE demandes SET dispo = FALSE WHERE id = $1 RETURNING {}", DEMANDE_COLUMNS);
        let accepted = sqlx::query_as::<_, Demande>(&sql)
            .bind(demande.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Étudiant déjà affecté à un PFE"))?;

        let dropped = sqlx::query("DELETE FROM demandes WHERE student_id = $1 AND dispo = TRUE AND id <> $2")
            .bind(demande.student_id)
            .bind(demande.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "Demande {} accepted for PFE {}; {} other pending demandes removed",
            accepted.id,
            accepted.pfe_id,
            dropped.rows_affected()
        );
        Ok(accepted)
    }

    /// Refuses or removes a demande addressed to the professor.
    pub async fn delete_for_prof(&self, id: DbId, prof_id: DbId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM demandes WHERE id = $1 AND prof_id = $2")
            .bind(id)
            .bind(prof_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Demande introuvable".to_string()));
        }
        Ok(())
    }

    /// Withdraws one of the student's own pending demandes.
    pub async fn delete_pending_for_student(&self, id: DbId, student_id: DbId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM demandes WHERE id = $1 AND student_id = $2 AND dispo = TRUE")
            .bind(id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Demande introuvable".to_string()));
        }
        Ok(())
    }
}
