use super::error::FormError;
use super::types::{FieldErrors, FieldMap, FieldValue, FormSchema};
use super::validate::validate_step;

/// Wizard-style form driven by a [`FormSchema`].
///
/// `next` validates only the current step, `previous` never validates, and
/// `submit` re-validates every step before handing the accumulated values to
/// the caller. Editing a field drops that field's pending error.
#[derive(Debug, Clone)]
pub struct MultiStepForm {
    schema: FormSchema,
    current_step: usize,
    values: FieldMap,
    errors: FieldErrors,
}

impl MultiStepForm {
    pub fn new(schema: FormSchema) -> Self {
        Self { schema, current_step: 0, values: FieldMap::new(), errors: FieldErrors::new() }
    }

    pub fn with_values(mut self, values: FieldMap) -> Self {
        self.values = values;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.schema.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.step_count()
    }

    pub fn values(&self) -> &FieldMap {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.values.insert(name.to_string(), value.into());
        self.errors.remove(name);
    }

    /// Advance when the current step is valid. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        let Some(step) = self.schema.steps.get(self.current_step) else {
            return false;
        };
        let errors = validate_step(step, &self.values);
        if !errors.is_empty() {
            tracing::debug!(step = self.current_step, errors = errors.len(), "form step blocked");
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        if !self.is_last_step() {
            self.current_step += 1;
        }
        true
    }

    pub fn previous(&mut self) {
        self.errors.clear();
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Validate every step in order. On failure the form jumps to the first
    /// failing step and keeps its errors.
    pub fn validate_all(&mut self) -> Result<&FieldMap, FormError> {
        for (index, step) in self.schema.steps.iter().enumerate() {
            let errors = validate_step(step, &self.values);
            if !errors.is_empty() {
                self.current_step = index;
                self.errors = errors.clone();
                return Err(FormError::Invalid { step: index, field_errors: errors });
            }
        }
        self.errors.clear();
        Ok(&self.values)
    }

    /// Run `on_submit` with the accumulated values only if the whole form is valid.
    pub fn submit<F, R>(&mut self, on_submit: F) -> Result<R, FormError>
    where
        F: FnOnce(&FieldMap) -> R,
    {
        let values = self.validate_all()?;
        Ok(on_submit(values))
    }
}
