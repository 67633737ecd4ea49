//! Column sets of the portal's list screens.
//!
//! Shared by the list endpoints (search runs on rendered cells) and the CLI.

use serde_json::Value;

use super::types::{stringify, Column};
use crate::types::Role;

fn yes_no(value: &Value) -> String {
    match value.as_bool() {
        Some(true) => "Oui".to_string(),
        Some(false) => "Non".to_string(),
        None => String::new(),
    }
}

fn role_label(value: &Value) -> String {
    value
        .as_i64()
        .and_then(|code| Role::try_from(code as i16).ok())
        .map(|role| role.label().to_string())
        .unwrap_or_else(|| stringify(value))
}

/// `2024-06-30` -> `30/06/2024`; anything else is shown as is.
fn french_date(value: &Value) -> String {
    let raw = stringify(value);
    let date = raw.get(..10).unwrap_or(&raw);
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => raw,
    }
}

pub fn users() -> Vec<Column> {
    vec![
        Column::new("nom", "Nom"),
        Column::new("prenom", "Prénom"),
        Column::new("email", "Email"),
        Column::new("role", "Rôle").render(|v, _| role_label(v)),
        Column::new("filiereId", "Filière"),
    ]
}

pub fn students() -> Vec<Column> {
    vec![
        Column::new("nom", "Nom"),
        Column::new("prenom", "Prénom"),
        Column::new("email", "Email"),
        Column::new("cne", "CNE"),
        Column::new("valid", "Activé").render(|v, _| yes_no(v)),
    ]
}

pub fn professors() -> Vec<Column> {
    vec![
        Column::new("nom", "Nom"),
        Column::new("prenom", "Prénom"),
        Column::new("email", "Email"),
        Column::new("telephone", "Téléphone").unsortable(),
    ]
}

pub fn pfes() -> Vec<Column> {
    vec![
        Column::new("titre", "Titre"),
        Column::new("profNom", "Encadrant"),
        Column::new("domaineNom", "Domaine"),
        Column::new("affectes", "Places").render(|v, row| {
            format!("{}/{}", stringify(v), stringify(row.get("nbrEtd").unwrap_or(&Value::Null)))
        }),
        Column::new("avancement", "Avancement"),
        Column::new("dateSoutenance", "Soutenance").render(|v, _| french_date(v)),
        Column::new("prerequisites", "Prérequis")
            .unsortable()
            .render(|v, _| {
                v.as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|p| p.get("nom").and_then(Value::as_str))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default()
            }),
    ]
}

pub fn demandes() -> Vec<Column> {
    vec![
        Column::new("pfeTitre", "PFE"),
        Column::new("studentNom", "Étudiant"),
        Column::new("profNom", "Encadrant"),
        Column::new("dispo", "Statut").render(|v, _| match v.as_bool() {
            Some(false) => "Acceptée".to_string(),
            _ => "En attente".to_string(),
        }),
        Column::new("createdAt", "Date").render(|v, _| french_date(v)),
    ]
}

/// Filières, domaines and prerequisites.
pub fn catalog() -> Vec<Column> {
    vec![Column::new("id", "#"), Column::new("nom", "Nom")]
}
