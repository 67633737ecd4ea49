use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{Pfe, PfeDetail, Prerequisite};
use crate::types::{Avancement, DbId};

const PFE_COLUMNS: &str =
    "p.id, p.titre, p.description, p.domaine_id, p.prof_id, p.filiere_id, p.nbr_etd, p.avancement, p.date_soutenance";

const DETAIL_SELECT: &str = r#"
    SELECT p.id, p.titre, p.description, p.domaine_id, p.prof_id, p.filiere_id, p.nbr_etd,
           p.avancement, p.date_soutenance,
           (u.nom || ' ' || u.prenom) AS prof_nom,
           d.nom AS domaine_nom,
           (SELECT COUNT(*) FROM demandes a WHERE a.pfe_id = p.id AND a.dispo = FALSE) AS affectes
    FROM pfes p
    JOIN users u ON u.id = p.prof_id
    LEFT JOIN domaines d ON d.id = p.domaine_id
"#;

/// Writable fields of a project; the owner and filière come from the session.
#[derive(Debug, Clone)]
pub struct PfeInput {
    pub titre: String,
    pub description: String,
    pub domaine_id: Option<DbId>,
    pub nbr_etd: i32,
    pub date_soutenance: Option<NaiveDate>,
    pub prerequisite_ids: Vec<DbId>,
}

pub struct PfeRepository {
    pool: PgPool,
}

impl PfeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: DbId) -> Result<Option<Pfe>, DatabaseError> {
        let sql = format!("SELECT {} FROM pfes p WHERE p.id = $1", PFE_COLUMNS);
        Ok(sqlx::query_as::<_, Pfe>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn find_detail(&self, id: DbId) -> Result<PfeDetail, DatabaseError> {
        let sql = format!("{} WHERE p.id = $1", DETAIL_SELECT);
        let detail = sqlx::query_as::<_, PfeDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))?;
        let mut details = self.attach_prerequisites(vec![detail]).await?;
        details.pop().ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))
    }

    pub async fn list_by_prof(&self, prof_id: DbId) -> Result<Vec<PfeDetail>, DatabaseError> {
        let sql = format!("{} WHERE p.prof_id = $1 ORDER BY p.id DESC", DETAIL_SELECT);
        let details = sqlx::query_as::<_, PfeDetail>(&sql).bind(prof_id).fetch_all(&self.pool).await?;
        self.attach_prerequisites(details).await
    }

    pub async fn list_by_filiere(&self, filiere_id: DbId) -> Result<Vec<PfeDetail>, DatabaseError> {
        let sql = format!("{} WHERE p.filiere_id = $1 ORDER BY p.id DESC", DETAIL_SELECT);
        let details = sqlx::query_as::<_, PfeDetail>(&sql).bind(filiere_id).fetch_all(&self.pool).await?;
        self.attach_prerequisites(details).await
    }

    /// Loads the prerequisites of every listed project in one query.
    async fn attach_prerequisites(&self, mut details: Vec<PfeDetail>) -> Result<Vec<PfeDetail>, DatabaseError> {
        if details.is_empty() {
            return Ok(details);
        }
        let ids: Vec<DbId> = details.iter().map(|d| d.pfe.id).collect();
        let rows: Vec<(DbId, DbId, String, DbId)> = sqlx::query_as(
            r#"
            SELECT pp.pfe_id, r.id, r.nom, r.filiere_id
            FROM pfe_prerequis pp
            JOIN prerequis r ON r.id = pp.prerequis_id
            WHERE pp.pfe_id = ANY($1)
            ORDER BY r.nom
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_pfe: HashMap<DbId, Vec<Prerequisite>> = HashMap::new();
        for (pfe_id, id, nom, filiere_id) in rows {
            by_pfe.entry(pfe_id).or_default().push(Prerequisite { id, nom, filiere_id });
        }
        for detail in &mut details {
            detail.prerequisites = by_pfe.remove(&detail.pfe.id).unwrap_or_default();
        }
        Ok(details)
    }

    /// Inserts the project and its prerequisite links atomically.
    pub async fn create(&self, prof_id: DbId, filiere_id: DbId, input: PfeInput) -> Result<Pfe, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO pfes AS p (titre, description, domaine_id, prof_id, filiere_id, nbr_etd, date_soutenance)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PFE_COLUMNS
        );
        let pfe = sqlx::query_as::<_, Pfe>(&sql)
            .bind(input.titre.trim())
            .bind(input.description.trim())
            .bind(input.domaine_id)
            .bind(prof_id)
            .bind(filiere_id)
            .bind(input.nbr_etd)
            .bind(input.date_soutenance)
            .fetch_one(&mut *tx)
            .await?;

        link_prerequisites(&mut tx, pfe.id, filiere_id, &input.prerequisite_ids).await?;
        tx.commit().await?;

        debug!("Created PFE {} with {} prerequisites", pfe.id, input.prerequisite_ids.len());
        Ok(pfe)
    }

    /// Updates an owned project and replaces its prerequisite set atomically.
    ///
    /// The capacity may not drop below the students already assigned.
    pub async fn update(&self, id: DbId, prof_id: DbId, input: PfeInput) -> Result<Pfe, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM pfes WHERE id = $1 AND prof_id = $2 FOR UPDATE")
            .bind(id)
            .bind(prof_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))?;
        let accepted: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM demandes WHERE pfe_id = $1 AND dispo = FALSE")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        ensure_capacity(input.nbr_etd, accepted.0)?;

        let sql = format!(
            r#"
            UPDATE pfes AS p SET
                titre = $3,
                description = $4,
                domaine_id = $5,
                nbr_etd = $6,
                date_soutenance = $7
            WHERE p.id = $1 AND p.prof_id = $2
            RETURNING {}
            "#,
            PFE_COLUMNS
        );
        let pfe = sqlx::query_as::<_, Pfe>(&sql)
            .bind(id)
            .bind(prof_id)
            .bind(input.titre.trim())
            .bind(input.description.trim())
            .bind(input.domaine_id)
            .bind(input.nbr_etd)
            .bind(input.date_soutenance)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))?;

        sqlx::query("DELETE FROM pfe_prerequis WHERE pfe_id = $1").bind(pfe.id).execute(&mut *tx).await?;
        link_prerequisites(&mut tx, pfe.id, pfe.filiere_id, &input.prerequisite_ids).await?;
        tx.commit().await?;

        Ok(pfe)
    }

    /// Deletes a project owned by `prof_id`; links and demandes cascade.
    pub async fn delete(&self, id: DbId, prof_id: DbId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM pfes WHERE id = $1 AND prof_id = $2")
            .bind(id)
            .bind(prof_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("PFE introuvable".to_string()));
        }
        Ok(())
    }

    /// Progress update, restricted to projects of the given filière.
    pub async fn set_avancement(&self, id: DbId, filiere_id: DbId, avancement: Avancement) -> Result<Pfe, DatabaseError> {
        let sql = format!(
            "UPDATE pfes AS p SET avancement = $3 WHERE p.id = $1 AND p.filiere_id = $2 RETURNING {}",
            PFE_COLUMNS
        );
        sqlx::query_as::<_, Pfe>(&sql)
            .bind(id)
            .bind(filiere_id)
            .bind(avancement.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("PFE introuvable".to_string()))
    }
}

fn ensure_capacity(nbr_etd: i32, accepted: i64) -> Result<(), DatabaseError> {
    if (nbr_etd as i64) < accepted {
        return Err(DatabaseError::Conflict(format!(
            "{} étudiant(s) déjà affecté(s) à ce PFE, la capacité ne peut pas être inférieure",
            accepted
        )));
    }
    Ok(())
}

async fn link_prerequisites(
    tx: &mut Transaction<'_, Postgres>,
    pfe_id: DbId,
    filiere_id: DbId,
    prerequisite_ids: &[DbId],
) -> Result<(), DatabaseError> {
    if prerequisite_ids.is_empty() {
        return Ok(());
    }
    let mut ids = prerequisite_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let inserted = sqlx::query(
        r#"
        INSERT INTO pfe_prerequis (pfe_id, prerequis_id)
        SELECT $1, r.id FROM prerequis r
        WHERE r.id = ANY($2) AND r.filiere_id = $3
        "#,
    )
    .bind(pfe_id)
    .bind(&ids)
    .bind(filiere_id)
    .execute(&mut **tx)
    .await?;

    if inserted.rows_affected() != ids.len() as u64 {
        return Err(DatabaseError::NotFound("Prérequis introuvable dans cette filière".to_string()));
    }
    Ok(())
}
