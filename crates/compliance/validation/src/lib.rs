//! # compliance-validation
//!
//! Field Validation Engine for the Compliance Interaction Core.
//!
//! Evaluates a named field's value against its rule, optionally reading other
//! fields of the same form (e.g. a confirmation that must equal the password).
//! Rules are pure functions of `(value, snapshot)`; the engine never performs
//! I/O and never renders anything.
//!
//! ## Invariants
//!
//! - Rules are deterministic: identical inputs give identical results.
//! - An error is only *shown* once its field is touched; a submit attempt
//!   touches every field at once.
//! - When a field changes, every touched field whose rule reads it is
//!   re-validated against the new value. Dependencies are declared per rule,
//!   not wired per call site.
//!
//! ## Components
//!
//! - **FormField / FieldValue / FormValues**: typed field ids and snapshots
//! - **Rule**: required, bounded, email, selection, password, equality,
//!   checkbox and custom rules
//! - **FormSchema**: one rule per field plus the reverse dependency map
//! - **FormState**: touched tracking, error surfacing, cross-field propagation
//! - **PasswordPolicy / PasswordStrength**: strength predicates and the
//!   advisory 0-5 score

pub mod error;
pub mod field;
pub mod password;
pub mod rules;
pub mod schema;
pub mod state;

pub use error::{FieldError, SchemaError};
pub use field::{FieldValue, FormField, FormValues};
pub use password::{
    password_strength, CharClass, PasswordCriteria, PasswordPolicy, PasswordStrength,
    StrengthLabel,
};
pub use rules::{is_email, CheckFn, Rule};
pub use schema::{validate_field, FormSchema, FormSchemaBuilder, ValidationReport};
pub use state::FormState;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{FormField, FormSchema, PasswordPolicy, Rule};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Signup {
        Email,
        Password,
        Confirm,
        Consent,
    }

    impl FormField for Signup {
        const ALL: &'static [Self] = &[
            Signup::Email,
            Signup::Password,
            Signup::Confirm,
            Signup::Consent,
        ];

        fn name(&self) -> &'static str {
            match self {
                Signup::Email => "email",
                Signup::Password => "password",
                Signup::Confirm => "confirmPassword",
                Signup::Consent => "consent",
            }
        }
    }

    pub fn signup_schema() -> FormSchema<Signup> {
        FormSchema::builder()
            .field(Signup::Email, Rule::email())
            .field(Signup::Password, Rule::password(PasswordPolicy::default()))
            .field(
                Signup::Confirm,
                Rule::matches(
                    Signup::Password,
                    "Please confirm your password",
                    "Passwords do not match",
                ),
            )
            .field(
                Signup::Consent,
                Rule::accepted("You must agree to the privacy policy to register"),
            )
            .build()
            .expect("signup schema is well formed")
    }
}
