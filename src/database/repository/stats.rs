use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::types::{DbId, Role};

/// Department-head dashboard counters for one filière.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub students: i64,
    pub students_activated: i64,
    pub professors: i64,
    pub pfes: i64,
    pub pfes_en_attente: i64,
    pub pfes_en_cours: i64,
    pub pfes_termines: i64,
    pub demandes_pending: i64,
    pub demandes_accepted: i64,
}

pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self, filiere_id: DbId) -> Result<DashboardStats, DatabaseError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE filiere_id = $1 AND role = $2) AS students,
                (SELECT COUNT(*) FROM users WHERE filiere_id = $1 AND role = $2 AND valid) AS students_activated,
                (SELECT COUNT(*) FROM users WHERE filiere_id = $1 AND role = $3) AS professors,
                (SELECT COUNT(*) FROM pfes WHERE filiere_id = $1) AS pfes,
                (SELECT COUNT(*) FROM pfes WHERE filiere_id = $1 AND avancement = 'En attente') AS pfes_en_attente,
                (SELECT COUNT(*) FROM pfes WHERE filiere_id = $1 AND avancement = 'En cours') AS pfes_en_cours,
                (SELECT COUNT(*) FROM pfes WHERE filiere_id = $1 AND avancement = 'Terminé') AS pfes_termines,
                (SELECT COUNT(*) FROM demandes a JOIN pfes p ON p.id = a.pfe_id
                    WHERE p.filiere_id = $1 AND a.dispo) AS demandes_pending,
                (SELECT COUNT(*) FROM demandes a JOIN pfes p ON p.id = a.pfe_id
                    WHERE p.filiere_id = $1 AND NOT a.dispo) AS demandes_accepted
            "#,
        )
        .bind(filiere_id)
        .bind(Role::Student.code())
        .bind(Role::Professor.code())
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
