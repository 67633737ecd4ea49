use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{DbId, Role};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "i16")]
    pub role: Role,
    pub filiere_id: Option<DbId>,
    pub valid: bool,
    pub cne: Option<String>,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Students must be activated by their department head before logging in.
    pub fn is_activated(&self) -> bool {
        self.role != Role::Student || self.valid
    }
}

/// User as exposed over the API; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: DbId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: Role,
    pub filiere_id: Option<DbId>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cne: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_naissance: Option<NaiveDate>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nom: user.nom,
            prenom: user.prenom,
            email: user.email,
            role: user.role,
            filiere_id: user.filiere_id,
            valid: user.valid,
            cne: user.cne,
            telephone: user.telephone,
            date_naissance: user.date_naissance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, valid: bool) -> User {
        User {
            id: 1,
            nom: "Alami".into(),
            prenom: "Sara".into(),
            email: "sara@uni.ma".into(),
            password_hash: "$argon2id$...".into(),
            role,
            filiere_id: Some(1),
            valid,
            cne: None,
            telephone: None,
            date_naissance: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_students_need_activation() {
        assert!(!user(Role::Student, false).is_activated());
        assert!(user(Role::Student, true).is_activated());
        assert!(user(Role::Professor, false).is_activated());
    }

    #[test]
    fn public_user_hides_password() {
        let json = serde_json::to_value(PublicUser::from(user(Role::Student, true))).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], 2);
        assert_eq!(json["filiereId"], 1);
    }
}
