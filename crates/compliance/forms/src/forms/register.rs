//! Account registration with privacy-policy consent.

use std::fmt;

use chrono::{DateTime, Utc};
use compliance_validation::{
    password_strength, FormField, FormSchema, FormValues, PasswordPolicy, PasswordStrength, Rule,
    SchemaError,
};
use serde::{Deserialize, Serialize};

use crate::kind::FormKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterField {
    Email,
    Password,
    ConfirmPassword,
    Consent,
}

impl FormField for RegisterField {
    const ALL: &'static [Self] = &[
        RegisterField::Email,
        RegisterField::Password,
        RegisterField::ConfirmPassword,
        RegisterField::Consent,
    ];

    fn name(&self) -> &'static str {
        match self {
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
            RegisterField::Consent => "consent",
        }
    }
}

/// Registration form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub password_policy: PasswordPolicy,
}

impl RegisterForm {
    pub fn new(password_policy: PasswordPolicy) -> Self {
        Self { password_policy }
    }

    /// Advisory meter for the password currently typed.
    pub fn strength(&self, password: &str) -> PasswordStrength {
        password_strength(password, &self.password_policy)
    }
}

impl FormKind for RegisterForm {
    type Field = RegisterField;
    type Payload = RegistrationPayload;

    const NAME: &'static str = "register";

    fn schema(&self) -> Result<FormSchema<RegisterField>, SchemaError> {
        FormSchema::builder()
            .field(RegisterField::Email, Rule::email())
            .field(
                RegisterField::Password,
                Rule::password(self.password_policy.clone()),
            )
            .field(
                RegisterField::ConfirmPassword,
                Rule::matches(
                    RegisterField::Password,
                    "Please confirm your password",
                    "Passwords do not match",
                ),
            )
            .field(
                RegisterField::Consent,
                Rule::accepted("You must agree to the privacy policy to register"),
            )
            .build()
    }

    fn payload(
        &self,
        values: &FormValues<RegisterField>,
        submitted_at: DateTime<Utc>,
    ) -> RegistrationPayload {
        RegistrationPayload {
            email: values.text(RegisterField::Email).trim().to_string(),
            password: values.text(RegisterField::Password).to_string(),
            consent: values.flag(RegisterField::Consent),
            timestamp: submitted_at,
        }
    }
}

/// Sanitized registration submitted to the collaborator.
///
/// The password is passed through as typed; whitespace is significant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub email: String,
    pub password: String,
    pub consent: bool,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("consent", &self.consent)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
