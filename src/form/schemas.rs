use chrono::NaiveDate;

use super::types::{Field, FieldType, FormSchema, SelectOption, Step};

/// Fields only the interactive client collects; the server validates the
/// registration schema without them.
pub const CLIENT_ONLY_FIELDS: [&str; 2] = ["confirmPassword", "conditions"];

/// Three-step student sign-up: identity, account, academic track.
/// `filieres` feeds the track selector, `today` caps the birth date.
pub fn student_registration(filieres: Vec<SelectOption>, today: NaiveDate, min_password_length: usize) -> FormSchema {
    FormSchema::new(vec![
        Step::new("Informations personnelles", vec![
            Field::new("nom", "Nom", FieldType::Text).required(),
            Field::new("prenom", "Prénom", FieldType::Text).required(),
            Field::new("dateNaissance", "Date de naissance", FieldType::Date).required().max_date(today),
            Field::new("telephone", "Téléphone", FieldType::Tel),
        ]),
        Step::new("Compte", vec![
            Field::new("email", "Email", FieldType::Email).required(),
            Field::new("password", "Mot de passe", FieldType::Password).required().min_length(min_password_length),
            Field::new("confirmPassword", "Confirmer le mot de passe", FieldType::Password).required(),
        ]),
        Step::new("Parcours", vec![
            Field::new("idFiliere", "Filière", FieldType::Select).required().options(filieres),
            Field::new("cne", "CNE", FieldType::Text).required(),
            Field::new("conditions", "J'accepte les conditions d'utilisation", FieldType::Checkbox).required(),
        ]),
    ])
}

/// Single-step project proposal filled in by a professor.
pub fn pfe_proposal(domaines: Vec<SelectOption>, latest_defense: NaiveDate) -> FormSchema {
    FormSchema::new(vec![Step::new("Projet", vec![
        Field::new("titre", "Titre", FieldType::Text).required(),
        Field::new("description", "Description", FieldType::Textarea).required(),
        Field::new("idDomaine", "Domaine", FieldType::Select).required().options(domaines),
        Field::new("nbrEtd", "Nombre d'étudiants", FieldType::Number).required().range(Some(1.0), Some(4.0)),
        Field::new("dateSoutenance", "Date de soutenance", FieldType::Date).max_date(latest_defense),
    ])])
}
