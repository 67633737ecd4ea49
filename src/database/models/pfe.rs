use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Prerequisite;
use crate::types::{Avancement, DbId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pfe {
    pub id: DbId,
    pub titre: String,
    pub description: String,
    pub domaine_id: Option<DbId>,
    pub prof_id: DbId,
    pub filiere_id: DbId,
    pub nbr_etd: i32,
    #[sqlx(try_from = "String")]
    pub avancement: Avancement,
    pub date_soutenance: Option<NaiveDate>,
}

/// Project joined with its professor, domaine, acceptance count and prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PfeDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pfe: Pfe,
    pub prof_nom: String,
    pub domaine_nom: Option<String>,
    /// Students already assigned (accepted demandes)
    pub affectes: i64,
    #[sqlx(skip)]
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
}
