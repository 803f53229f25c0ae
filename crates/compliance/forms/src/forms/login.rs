use std::fmt;

use chrono::{DateTime, Utc};
use compliance_validation::{FormField, FormSchema, FormValues, Rule, SchemaError};
use serde::{Deserialize, Serialize};

use crate::kind::FormKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    const ALL: &'static [Self] = &[LoginField::Email, LoginField::Password];

    fn name(&self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

/// Sign-in form: a well-formed email and any non-empty password.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoginForm;

impl FormKind for LoginForm {
    type Field = LoginField;
    type Payload = LoginPayload;

    const NAME: &'static str = "login";

    fn schema(&self) -> Result<FormSchema<LoginField>, SchemaError> {
        FormSchema::builder()
            .field(LoginField::Email, Rule::email())
            .field(LoginField::Password, Rule::present("Password"))
            .build()
    }

    fn payload(&self, values: &FormValues<LoginField>, submitted_at: DateTime<Utc>) -> LoginPayload {
        LoginPayload {
            email: values.text(LoginField::Email).trim().to_string(),
            password: values.text(LoginField::Password).to_string(),
            timestamp: submitted_at,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
