use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::password::CharClass;

/// A per-field, user-correctable validation failure.
///
/// Never fatal: the presentation layer renders it inline next to the field,
/// and only once the field has been touched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("{label} is required")]
    Required { label: String },

    #[error("{label} must be at least {min} characters")]
    TooShort { label: String, min: usize },

    #[error("{label} must not exceed {max} characters")]
    TooLong { label: String, max: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please select a {label}")]
    NotSelected { label: String },

    #[error("Password must contain at least one {class}")]
    MissingCharacter { class: CharClass },

    #[error("Password must contain at least one special character ({set})")]
    MissingSpecial { set: String },

    #[error("{message}")]
    Unconfirmed { message: String },

    #[error("{message}")]
    Mismatch { message: String },

    #[error("{message}")]
    NotAccepted { message: String },

    #[error("{message}")]
    Invalid { message: String },
}

/// Errors in how a form schema was put together.
///
/// These are programming errors: a correctly declared form never produces
/// them at run time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no rule declared for field `{0}`")]
    MissingRule(&'static str),

    #[error("rule declared twice for field `{0}`")]
    DuplicateRule(&'static str),

    #[error("field `{field}` depends on `{dependency}`, which is not part of the form")]
    UnknownDependency {
        field: &'static str,
        dependency: &'static str,
    },

    #[error("field `{0}` depends on itself")]
    SelfDependency(&'static str),

    #[error("unknown field name: {0}")]
    UnknownField(String),

    #[error("rule for field `{field}` can never pass: {reason}")]
    UnsatisfiableRule { field: &'static str, reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_messages() {
        let err = FieldError::Required {
            label: "Email".into(),
        };
        assert_eq!(err.to_string(), "Email is required");

        let err = FieldError::TooShort {
            label: "Name".into(),
            min: 2,
        };
        assert_eq!(err.to_string(), "Name must be at least 2 characters");

        let err = FieldError::MissingCharacter {
            class: CharClass::Uppercase,
        };
        assert_eq!(
            err.to_string(),
            "Password must contain at least one uppercase letter"
        );

        let err = FieldError::NotSelected {
            label: "request type".into(),
        };
        assert_eq!(err.to_string(), "Please select a request type");
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError::UnknownDependency {
            field: "confirmPassword",
            dependency: "password",
        };
        assert!(err.to_string().contains("confirmPassword"));
        assert!(err.to_string().contains("password"));
    }
}
