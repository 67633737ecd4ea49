use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Domaine {
    pub id: DbId,
    pub nom: String,
    pub filiere_id: DbId,
}
