use chrono::{DateTime, Utc};
use compliance_validation::{FormField, FormSchema, FormValues, SchemaError};
use serde::Serialize;

/// A concrete form: its fields, rules, starting values and payload shape.
pub trait FormKind: Send + Sync + 'static {
    /// Field enum of the form.
    type Field: FormField;
    /// Sanitized payload handed to the submit collaborator.
    type Payload: Serialize + Send + 'static;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Rule set for the form.
    fn schema(&self) -> Result<FormSchema<Self::Field>, SchemaError>;

    /// Values the form starts from (and returns to on reset).
    fn initial_values(&self) -> FormValues<Self::Field> {
        FormValues::new()
    }

    /// Build the payload from a snapshot that passed validation.
    fn payload(
        &self,
        values: &FormValues<Self::Field>,
        submitted_at: DateTime<Utc>,
    ) -> Self::Payload;
}
