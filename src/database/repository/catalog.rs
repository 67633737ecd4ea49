use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Domaine, Filiere, Prerequisite};
use crate::types::DbId;

/// Name-only reference tables scoped to a filière (`domaines`, `prerequis`).
pub struct CatalogRepository<T> {
    table_name: &'static str,
    not_found: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl CatalogRepository<Domaine> {
    pub fn domaines(pool: PgPool) -> Self {
        Self::new("domaines", "Domaine introuvable", pool)
    }
}

impl CatalogRepository<Prerequisite> {
    pub fn prerequisites(pool: PgPool) -> Self {
        Self::new("prerequis", "Prérequis introuvable", pool)
    }
}

impl<T> CatalogRepository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    fn new(table_name: &'static str, not_found: &'static str, pool: PgPool) -> Self {
        Self { table_name, not_found, pool, _phantom: std::marker::PhantomData }
    }

    pub async fn list_by_filiere(&self, filiere_id: DbId) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT id, nom, filiere_id FROM {} WHERE filiere_id = $1 ORDER BY nom", self.table_name);
        Ok(sqlx::query_as::<_, T>(&sql).bind(filiere_id).fetch_all(&self.pool).await?)
    }

    pub async fn filiere_of(&self, id: DbId) -> Result<DbId, DatabaseError> {
        let sql = format!("SELECT filiere_id FROM {} WHERE id = $1", self.table_name);
        let row: Option<(DbId,)> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(|(filiere_id,)| filiere_id).ok_or_else(|| DatabaseError::NotFound(self.not_found.to_string()))
    }

    pub async fn create(&self, nom: &str, filiere_id: DbId) -> Result<T, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (nom, filiere_id) VALUES ($1, $2) RETURNING id, nom, filiere_id",
            self.table_name
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(nom.trim())
            .bind(filiere_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Ce nom existe déjà dans la filière"))
    }

    /// Rename within the caller's filière only.
    pub async fn update(&self, id: DbId, nom: &str, filiere_id: DbId) -> Result<T, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET nom = $2 WHERE id = $1 AND filiere_id = $3 RETURNING id, nom, filiere_id",
            self.table_name
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(nom.trim())
            .bind(filiere_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Ce nom existe déjà dans la filière"))?
            .ok_or_else(|| DatabaseError::NotFound(self.not_found.to_string()))
    }

    pub async fn delete(&self, id: DbId, filiere_id: DbId) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND filiere_id = $2", self.table_name);
        let result = sqlx::query(&sql).bind(id).bind(filiere_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(self.not_found.to_string()));
        }
        Ok(())
    }
}

pub struct FiliereRepository {
    pool: PgPool,
}

impl FiliereRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Filiere>, DatabaseError> {
        Ok(sqlx::query_as::<_, Filiere>("SELECT id, nom FROM filieres ORDER BY nom").fetch_all(&self.pool).await?)
    }

    pub async fn create(&self, nom: &str) -> Result<Filiere, DatabaseError> {
        sqlx::query_as::<_, Filiere>("INSERT INTO filieres (nom) VALUES ($1) RETURNING id, nom")
            .bind(nom.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Cette filière existe déjà"))
    }

    pub async fn update(&self, id: DbId, nom: &str) -> Result<Filiere, DatabaseError> {
        sqlx::query_as::<_, Filiere>("UPDATE filieres SET nom = $2 WHERE id = $1 RETURNING id, nom")
            .bind(id)
            .bind(nom.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::unique_violation(e, "Cette filière existe déjà"))?
            .ok_or_else(|| DatabaseError::NotFound("Filière introuvable".to_string()))
    }

    pub async fn delete(&self, id: DbId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM filieres WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Filière introuvable".to_string()));
        }
        Ok(())
    }
}
