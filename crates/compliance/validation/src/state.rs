use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::FieldError;
use crate::field::{FieldValue, FormField, FormValues};
use crate::schema::{FormSchema, ValidationReport};

/// Mutable state of one form instance.
///
/// Tracks current values, which fields have been touched, and the last
/// computed error per field. An error may be computed before the field is
/// touched but is only surfaced through [`FormState::visible_error`] once it
/// has been.
#[derive(Debug, Clone)]
pub struct FormState<F: FormField> {
    schema: Arc<FormSchema<F>>,
    initial: FormValues<F>,
    values: FormValues<F>,
    touched: HashSet<F>,
    errors: HashMap<F, FieldError>,
    live_validation: bool,
}

impl<F: FormField> FormState<F> {
    pub fn new(schema: Arc<FormSchema<F>>) -> Self {
        Self::with_values(schema, FormValues::new())
    }

    /// Start from caller-supplied initial values. [`FormState::reset`]
    /// returns to these.
    pub fn with_values(schema: Arc<FormSchema<F>>, initial: FormValues<F>) -> Self {
        Self {
            schema,
            values: initial.clone(),
            initial,
            touched: HashSet::new(),
            errors: HashMap::new(),
            live_validation: true,
        }
    }

    /// When off, edits and blurs do not compute errors for the edited field;
    /// errors surface only through [`FormState::validate_all`]. Dependents are
    /// still kept current.
    pub fn set_live_validation(&mut self, enabled: bool) {
        self.live_validation = enabled;
    }

    pub fn schema(&self) -> &Arc<FormSchema<F>> {
        &self.schema
    }

    pub fn values(&self) -> &FormValues<F> {
        &self.values
    }

    pub fn value(&self, field: F) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn is_touched(&self, field: F) -> bool {
        self.touched.contains(&field)
    }

    /// Last computed error, whether or not the field is touched.
    pub fn error(&self, field: F) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Error to display: only for touched fields.
    pub fn visible_error(&self, field: F) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.errors.get(&field)
        } else {
            None
        }
    }

    /// Record an edit.
    ///
    /// Re-validates the field itself when touched, then every touched field
    /// whose rule reads this one, using the new value.
    pub fn set_value(&mut self, field: F, value: impl Into<FieldValue>) {
        self.values.set(field, value);

        if self.live_validation && self.is_touched(field) {
            self.revalidate(field);
        }

        let schema = Arc::clone(&self.schema);
        for dependent in schema.dependents(field) {
            if self.is_touched(*dependent) {
                debug!(
                    field = field.name(),
                    dependent = dependent.name(),
                    "Re-validating dependent field"
                );
                self.revalidate(*dependent);
            }
        }
    }

    /// Record that a field lost focus.
    pub fn blur(&mut self, field: F) {
        self.touched.insert(field);
        if self.live_validation {
            self.revalidate(field);
        }
    }

    /// Validate every field, replace the error map, and touch every field.
    pub fn validate_all(&mut self) -> ValidationReport<F> {
        let report = self.schema.validate_all(&self.values);
        self.errors = report.iter().map(|(f, err)| (f, err.clone())).collect();
        self.touched.extend(self.schema.fields());
        debug!(errors = report.len(), "Validated full form");
        report
    }

    /// Whether the current snapshot passes every rule. Pure: touches nothing.
    pub fn is_valid(&self) -> bool {
        self.schema.validate_all(&self.values).is_valid()
    }

    /// Discard values, touched flags and errors.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.errors.clear();
    }

    fn revalidate(&mut self, field: F) {
        match self.schema.validate_field(field, &self.values) {
            Some(err) => {
                self.errors.insert(field, err);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{signup_schema, Signup};

    fn state() -> FormState<Signup> {
        FormState::new(Arc::new(signup_schema()))
    }

    #[test]
    fn errors_hidden_until_touched() {
        let mut form = state();
        form.set_value(Signup::Email, "not-an-email");
        assert!(form.visible_error(Signup::Email).is_none());

        form.blur(Signup::Email);
        assert_eq!(
            form.visible_error(Signup::Email).unwrap().to_string(),
            "Please enter a valid email address"
        );

        form.set_value(Signup::Email, "ada@example.com");
        assert!(form.visible_error(Signup::Email).is_none());
    }

    #[test]
    fn password_change_invalidates_touched_confirmation() {
        let mut form = state();
        form.set_value(Signup::Password, "Abc12345!");
        form.blur(Signup::Password);
        form.set_value(Signup::Confirm, "Abc12345!");
        form.blur(Signup::Confirm);
        assert!(form.visible_error(Signup::Confirm).is_none());

        form.set_value(Signup::Password, "Abc12345!!");
        assert_eq!(
            form.visible_error(Signup::Confirm).unwrap().to_string(),
            "Passwords do not match"
        );

        form.set_value(Signup::Password, "Abc12345!");
        assert!(form.visible_error(Signup::Confirm).is_none());
    }

    #[test]
    fn untouched_dependent_is_not_revalidated() {
        let mut form = state();
        form.set_value(Signup::Confirm, "Abc12345!");
        form.set_value(Signup::Password, "different1!A");
        assert!(form.error(Signup::Confirm).is_none());
    }

    #[test]
    fn validate_all_touches_every_field() {
        let mut form = state();
        let report = form.validate_all();
        assert_eq!(report.len(), 4);
        for field in Signup::ALL {
            assert!(form.is_touched(*field));
            assert!(form.visible_error(*field).is_some());
        }
    }

    #[test]
    fn validate_all_clears_fixed_errors() {
        let mut form = state();
        form.validate_all();
        form.set_value(Signup::Email, "ada@example.com");
        form.set_value(Signup::Password, "Abc12345!");
        form.set_value(Signup::Confirm, "Abc12345!");
        form.set_value(Signup::Consent, true);
        let report = form.validate_all();
        assert!(report.is_valid());
        assert!(Signup::ALL.iter().all(|f| form.error(*f).is_none()));
    }

    #[test]
    fn live_validation_off_defers_errors_to_submit() {
        let mut form = state();
        form.set_live_validation(false);
        form.set_value(Signup::Email, "bad");
        form.blur(Signup::Email);
        assert!(form.visible_error(Signup::Email).is_none());

        form.validate_all();
        assert!(form.visible_error(Signup::Email).is_some());
    }

    #[test]
    fn reset_restores_initial_values() {
        let initial = FormValues::new().with(Signup::Email, "ada@example.com");
        let mut form = FormState::with_values(Arc::new(signup_schema()), initial);
        form.set_value(Signup::Email, "other@example.com");
        form.validate_all();

        form.reset();
        assert_eq!(form.values().text(Signup::Email), "ada@example.com");
        assert!(!form.is_touched(Signup::Email));
        assert!(form.error(Signup::Password).is_none());
    }

    #[test]
    fn is_valid_does_not_touch() {
        let form = state();
        assert!(!form.is_valid());
        assert!(!form.is_touched(Signup::Email));
    }
}
