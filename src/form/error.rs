use thiserror::Error;

use super::types::FieldErrors;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Formulaire invalide (étape {})", .step + 1)]
    Invalid { step: usize, field_errors: FieldErrors },
}

impl FormError {
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            FormError::Invalid { field_errors, .. } => field_errors,
        }
    }
}
