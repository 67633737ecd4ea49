use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Field, FieldErrors, FieldMap, FieldType, FieldValue, Step};

pub const PASSWORD_FIELD: &str = "password";
pub const CONFIRM_PASSWORD_FIELD: &str = "confirmPassword";

pub const MSG_REQUIRED: &str = "Ce champ est obligatoire";
pub const MSG_EMAIL: &str = "Adresse email invalide";
pub const MSG_DATE: &str = "Date invalide";
pub const MSG_NUMBER: &str = "Valeur numérique invalide";
pub const MSG_SELECT: &str = "Choix invalide";
pub const MSG_PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// First error of a single field, if any.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> Option<String> {
    if field.field_type == FieldType::Checkbox {
        let checked = value.map(FieldValue::is_checked).unwrap_or(false);
        return (field.required && !checked).then(|| MSG_REQUIRED.to_string());
    }

    let text = value.and_then(FieldValue::as_text).map(str::trim).unwrap_or("");
    if text.is_empty() {
        return field.required.then(|| MSG_REQUIRED.to_string());
    }

    match field.field_type {
        FieldType::Email if !is_valid_email(text) => Some(MSG_EMAIL.to_string()),
        FieldType::Date => validate_date(field, text),
        FieldType::Number => validate_number(field, text),
        FieldType::Select if !field.options.is_empty() && !field.options.iter().any(|o| o.value == text) => {
            Some(MSG_SELECT.to_string())
        }
        FieldType::Password => field
            .min_length
            .filter(|min| text.chars().count() < *min)
            .map(|min| format!("Le mot de passe doit contenir au moins {} caractères", min)),
        _ => None,
    }
}

fn validate_date(field: &Field, text: &str) -> Option<String> {
    let date = match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return Some(MSG_DATE.to_string()),
    };
    match field.max_date {
        Some(max) if date > max => Some(format!("La date ne peut pas dépasser le {}", max.format("%d/%m/%Y"))),
        _ => None,
    }
}

fn validate_number(field: &Field, text: &str) -> Option<String> {
    let n: f64 = match text.parse() {
        Ok(n) => n,
        Err(_) => return Some(MSG_NUMBER.to_string()),
    };
    if let Some(min) = field.min {
        if n < min {
            return Some(format!("La valeur minimale est {}", min));
        }
    }
    if let Some(max) = field.max {
        if n > max {
            return Some(format!("La valeur maximale est {}", max));
        }
    }
    None
}

/// All errors of one step, including the password confirmation check when
/// the step carries both password fields.
pub fn validate_step(step: &Step, values: &FieldMap) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in &step.fields {
        if let Some(msg) = validate_field(field, values.get(&field.name)) {
            errors.insert(field.name.clone(), msg);
        }
    }

    if step.has_field(PASSWORD_FIELD) && step.has_field(CONFIRM_PASSWORD_FIELD) && !errors.contains_key(CONFIRM_PASSWORD_FIELD) {
        let password = values.get(PASSWORD_FIELD).and_then(FieldValue::as_text).unwrap_or("");
        let confirm = values.get(CONFIRM_PASSWORD_FIELD).and_then(FieldValue::as_text).unwrap_or("");
        if password != confirm {
            errors.insert(CONFIRM_PASSWORD_FIELD.to_string(), MSG_PASSWORD_MISMATCH.to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::types::SelectOption;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn required_text_rejects_blank() {
        let field = Field::new("nom", "Nom", FieldType::Text).required();
        assert_eq!(validate_field(&field, None).as_deref(), Some(MSG_REQUIRED));
        assert_eq!(validate_field(&field, Some(&text("   "))).as_deref(), Some(MSG_REQUIRED));
        assert!(validate_field(&field, Some(&text("Alami"))).is_none());
    }

    #[test]
    fn optional_blank_skips_type_checks() {
        let field = Field::new("email", "Email", FieldType::Email);
        assert!(validate_field(&field, Some(&text(""))).is_none());
    }

    #[test]
    fn required_checkbox_needs_true() {
        let field = Field::new("conditions", "J'accepte", FieldType::Checkbox).required();
        assert!(validate_field(&field, Some(&FieldValue::Bool(false))).is_some());
        assert!(validate_field(&field, None).is_some());
        assert!(validate_field(&field, Some(&FieldValue::Bool(true))).is_none());
    }

    #[test]
    fn email_format() {
        let field = Field::new("email", "Email", FieldType::Email).required();
        assert_eq!(validate_field(&field, Some(&text("pas-un-email"))).as_deref(), Some(MSG_EMAIL));
        assert_eq!(validate_field(&field, Some(&text("a@b"))).as_deref(), Some(MSG_EMAIL));
        assert!(validate_field(&field, Some(&text("etudiant@uni.ma"))).is_none());
    }

    #[test]
    fn date_not_after_max() {
        let max = NaiveDate::from_ymd_opt(2006, 12, 31).unwrap();
        let field = Field::new("dateNaissance", "Date", FieldType::Date).max_date(max);
        assert!(validate_field(&field, Some(&text("2006-12-31"))).is_none());
        assert!(validate_field(&field, Some(&text("2007-01-01"))).unwrap().contains("31/12/2006"));
        assert_eq!(validate_field(&field, Some(&text("31/12/2006"))).as_deref(), Some(MSG_DATE));
    }

    #[test]
    fn number_bounds() {
        let field = Field::new("nbrEtd", "Nombre", FieldType::Number).range(Some(1.0), Some(3.0));
        assert!(validate_field(&field, Some(&text("2"))).is_none());
        assert!(validate_field(&field, Some(&text("4"))).is_some());
        assert_eq!(validate_field(&field, Some(&text("deux"))).as_deref(), Some(MSG_NUMBER));
    }

    #[test]
    fn select_must_be_an_option() {
        let field = Field::new("idFiliere", "Filière", FieldType::Select)
            .options(vec![SelectOption::new("1", "GI"), SelectOption::new("2", "GC")]);
        assert!(validate_field(&field, Some(&text("2"))).is_none());
        assert_eq!(validate_field(&field, Some(&text("9"))).as_deref(), Some(MSG_SELECT));
    }

    #[test]
    fn password_mismatch_uses_dedicated_key() {
        let step = Step::new(
            "Compte",
            vec![
                Field::new(PASSWORD_FIELD, "Mot de passe", FieldType::Password).required(),
                Field::new(CONFIRM_PASSWORD_FIELD, "Confirmation", FieldType::Password).required(),
            ],
        );
        let mut values = FieldMap::new();
        values.insert(PASSWORD_FIELD.into(), text("secret1"));
        values.insert(CONFIRM_PASSWORD_FIELD.into(), text("secret2"));
        let errors = validate_step(&step, &values);
        assert_eq!(errors.get(CONFIRM_PASSWORD_FIELD).map(String::as_str), Some(MSG_PASSWORD_MISMATCH));
        assert!(!errors.contains_key(PASSWORD_FIELD));

        values.insert(CONFIRM_PASSWORD_FIELD.into(), text("secret1"));
        assert!(validate_step(&step, &values).is_empty());
    }

    #[test]
    fn password_check_needs_both_fields_in_the_step() {
        let step = Step::new("Compte", vec![Field::new(PASSWORD_FIELD, "Mot de passe", FieldType::Password).required()]);
        let mut values = FieldMap::new();
        values.insert(PASSWORD_FIELD.into(), text("secret1"));
        values.insert(CONFIRM_PASSWORD_FIELD.into(), text("other"));
        assert!(validate_step(&step, &values).is_empty());
    }
}
