use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Demande {
    pub id: DbId,
    pub pfe_id: DbId,
    pub student_id: DbId,
    pub prof_id: DbId,
    /// `true` while pending, `false` once the professor accepted it
    pub dispo: bool,
    pub created_at: DateTime<Utc>,
}

impl Demande {
    pub fn is_pending(&self) -> bool {
        self.dispo
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DemandeDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub demande: Demande,
    pub pfe_titre: String,
    pub student_nom: String,
    pub student_email: String,
    pub prof_nom: String,
}
