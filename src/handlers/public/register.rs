// handlers/public/register.rs - POST /registerStudent

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::auth::hash_password;
use crate::database::{
    models::PublicUser,
    repository::{FiliereRepository, NewUser, UserRepository},
};
use crate::error::ApiError;
use crate::form::{
    field_map_from_json,
    schemas::{student_registration, CLIENT_ONLY_FIELDS},
    FieldMap, MultiStepForm, SelectOption,
};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Role;

/// Trimmed text value of a field, `None` when absent or blank.
pub(crate) fn text_value(values: &FieldMap, name: &str) -> Option<String> {
    values.get(name).and_then(|v| v.as_text()).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub(crate) fn id_value(values: &FieldMap, name: &str) -> Result<Option<i64>, ApiError> {
    text_value(values, name)
        .map(|raw| raw.parse::<i64>().map_err(|_| ApiError::field_error(name, "Identifiant invalide")))
        .transpose()
}

/// POST /registerStudent - self sign-up of an unactivated student
///
/// The body is checked against the registration form (minus the fields
/// only the interactive client collects). 400 with `field_errors` on
/// invalid input, 409 when the email is taken.
pub async fn register_student_post(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<PublicUser> {
    let filieres = FiliereRepository::new(state.pool.clone()).list().await?;
    let options = filieres.iter().map(|f| SelectOption::new(f.id.to_string(), f.nom.clone())).collect();

    let today = Utc::now().date_naive();
    let schema = student_registration(options, today, state.config.security.min_password_length)
        .without_fields(&CLIENT_ONLY_FIELDS);
    let mut form = MultiStepForm::new(schema).with_values(field_map_from_json(&body));
    let values = form.validate_all()?.clone();

    let password = text_value(&values, "password").unwrap_or_default();
    let date_naissance = text_value(&values, "dateNaissance")
        .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok());

    let user = UserRepository::new(state.pool.clone())
        .create(NewUser {
            nom: text_value(&values, "nom").unwrap_or_default(),
            prenom: text_value(&values, "prenom").unwrap_or_default(),
            email: text_value(&values, "email").unwrap_or_default(),
            password_hash: hash_password(&password)?,
            role: Role::Student,
            filiere_id: id_value(&values, "idFiliere")?,
            valid: false,
            cne: text_value(&values, "cne"),
            telephone: text_value(&values, "telephone"),
            date_naissance,
        })
        .await?;

    tracing::info!(user_id = user.id, "Student registered, awaiting activation");
    Ok(ApiResponse::created(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;

    #[test]
    fn text_value_trims_and_drops_blanks() {
        let mut values = FieldMap::new();
        values.insert("nom".into(), FieldValue::from("  Alami "));
        values.insert("cne".into(), FieldValue::from("   "));
        assert_eq!(text_value(&values, "nom").as_deref(), Some("Alami"));
        assert_eq!(text_value(&values, "cne"), None);
        assert_eq!(text_value(&values, "absent"), None);
    }

    #[test]
    fn id_value_rejects_garbage() {
        let mut values = FieldMap::new();
        values.insert("idFiliere".into(), FieldValue::from("abc"));
        let err = id_value(&values, "idFiliere").unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["idFiliere"], "Identifiant invalide");
    }
}
