use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Filiere {
    pub id: DbId,
    pub nom: String,
}
