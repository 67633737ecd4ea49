/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key type of every table
pub type DbId = i64;

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Portal roles, serialized as their integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Role {
    Professor = 0,
    DeptHead = 1,
    Student = 2,
    Admin = 3,
}

impl Role {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Professor => "Professeur",
            Role::DeptHead => "Chef de département",
            Role::Student => "Étudiant",
            Role::Admin => "Administrateur",
        }
    }

    /// Landing route of the role's dashboard
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Professor => "/prof",
            Role::DeptHead => "/chef",
            Role::Student => "/etudiant",
            Role::Admin => "/admin",
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = UnknownVariant;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Professor),
            1 => Ok(Role::DeptHead),
            2 => Ok(Role::Student),
            3 => Ok(Role::Admin),
            other => Err(UnknownVariant { kind: "role", value: other.to_string() }),
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: i16 = s.trim().parse().map_err(|_| UnknownVariant { kind: "role", value: s.to_string() })?;
        Role::try_from(code)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Project progress, stored and serialized as its French label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Avancement {
    #[default]
    EnAttente,
    EnCours,
    Termine,
}

impl Avancement {
    pub fn as_str(self) -> &'static str {
        match self {
            Avancement::EnAttente => "En attente",
            Avancement::EnCours => "En cours",
            Avancement::Termine => "Terminé",
        }
    }
}

impl TryFrom<String> for Avancement {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "En attente" => Ok(Avancement::EnAttente),
            "En cours" => Ok(Avancement::EnCours),
            "Terminé" | "Termine" => Ok(Avancement::Termine),
            _ => Err(UnknownVariant { kind: "avancement", value }),
        }
    }
}

impl From<Avancement> for String {
    fn from(avancement: Avancement) -> Self {
        avancement.as_str().to_string()
    }
}

impl fmt::Display for Avancement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_as_code() {
        assert_eq!(serde_json::to_value(Role::Student).unwrap(), serde_json::json!(2));
        let role: Role = serde_json::from_value(serde_json::json!(3)).unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_value::<Role>(serde_json::json!(7)).is_err());
    }

    #[test]
    fn role_parses_from_cookie_text() {
        assert_eq!("1".parse::<Role>().unwrap(), Role::DeptHead);
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn avancement_uses_french_labels() {
        assert_eq!(serde_json::to_value(Avancement::Termine).unwrap(), serde_json::json!("Terminé"));
        let parsed: Avancement = serde_json::from_value(serde_json::json!("En cours")).unwrap();
        assert_eq!(parsed, Avancement::EnCours);
        assert_eq!(Avancement::default(), Avancement::EnAttente);
    }
}
