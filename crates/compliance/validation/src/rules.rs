use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::FieldError;
use crate::field::{FieldValue, FormField, FormValues};
use crate::password::PasswordPolicy;

/// One or more non-space, non-`@` characters, `@`, the same, `.`, then one or
/// more non-space characters.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

/// Closure signature for custom rules.
pub type CheckFn<F> =
    Arc<dyn Fn(&FieldValue, &FormValues<F>) -> Option<FieldError> + Send + Sync>;

/// A validation rule for a single field.
///
/// Rules are pure: the same value and snapshot always yield the same result.
#[derive(Clone)]
pub enum Rule<F: FormField> {
    /// Trimmed text must be non-empty.
    RequiredText { label: String },
    /// Text must be non-empty, whitespace counts.
    Present { label: String },
    /// Trimmed text length within `min..=max`.
    BoundedText {
        label: String,
        min: usize,
        max: usize,
    },
    /// Required, then RFC-light address format.
    Email,
    /// A value from a fixed option set must be chosen.
    Selection { label: String, options: Vec<String> },
    /// Required, then every policy predicate.
    Password(PasswordPolicy),
    /// Must equal another field's current value.
    Matches {
        other: F,
        missing: String,
        mismatch: String,
    },
    /// Checkbox must be ticked.
    RequiredFlag { message: String },
    /// Caller-supplied check with declared dependencies.
    Custom { depends_on: Vec<F>, check: CheckFn<F> },
}

impl<F: FormField> Rule<F> {
    pub fn required(label: impl Into<String>) -> Self {
        Rule::RequiredText {
            label: label.into(),
        }
    }

    pub fn present(label: impl Into<String>) -> Self {
        Rule::Present {
            label: label.into(),
        }
    }

    pub fn bounded(label: impl Into<String>, min: usize, max: usize) -> Self {
        Rule::BoundedText {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn email() -> Self {
        Rule::Email
    }

    pub fn selection<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Selection {
            label: label.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn password(policy: PasswordPolicy) -> Self {
        Rule::Password(policy)
    }

    pub fn matches(other: F, missing: impl Into<String>, mismatch: impl Into<String>) -> Self {
        Rule::Matches {
            other,
            missing: missing.into(),
            mismatch: mismatch.into(),
        }
    }

    pub fn accepted(message: impl Into<String>) -> Self {
        Rule::RequiredFlag {
            message: message.into(),
        }
    }

    pub fn custom<C>(depends_on: Vec<F>, check: C) -> Self
    where
        C: Fn(&FieldValue, &FormValues<F>) -> Option<FieldError> + Send + Sync + 'static,
    {
        Rule::Custom {
            depends_on,
            check: Arc::new(check),
        }
    }

    /// Other fields whose values this rule reads.
    pub fn dependencies(&self) -> Vec<F> {
        match self {
            Rule::Matches { other, .. } => vec![*other],
            Rule::Custom { depends_on, .. } => depends_on.clone(),
            _ => Vec::new(),
        }
    }

    /// Why no value could ever satisfy this rule, if that is the case.
    pub fn unsatisfiable(&self) -> Option<String> {
        match self {
            Rule::BoundedText { min, max, .. } if min > max => Some(format!(
                "minimum length {min} exceeds maximum length {max}"
            )),
            Rule::Selection { options, .. } if options.is_empty() => {
                Some("no options to select from".to_string())
            }
            Rule::Password(policy) => policy.unsatisfiable().map(str::to_string),
            _ => None,
        }
    }

    /// Evaluate the rule. `None` means the value is valid.
    pub fn evaluate(&self, value: Option<&FieldValue>, values: &FormValues<F>) -> Option<FieldError> {
        match self {
            Rule::RequiredText { label } => {
                if text_of(value).trim().is_empty() {
                    return Some(FieldError::Required {
                        label: label.clone(),
                    });
                }
                None
            }
            Rule::Present { label } => {
                if text_of(value).is_empty() {
                    return Some(FieldError::Required {
                        label: label.clone(),
                    });
                }
                None
            }
            Rule::BoundedText { label, min, max } => {
                let trimmed = text_of(value).trim();
                if trimmed.is_empty() {
                    return Some(FieldError::Required {
                        label: label.clone(),
                    });
                }
                let len = trimmed.chars().count();
                if len < *min {
                    return Some(FieldError::TooShort {
                        label: label.clone(),
                        min: *min,
                    });
                }
                if len > *max {
                    return Some(FieldError::TooLong {
                        label: label.clone(),
                        max: *max,
                    });
                }
                None
            }
            Rule::Email => {
                let trimmed = text_of(value).trim();
                if trimmed.is_empty() {
                    return Some(FieldError::Required {
                        label: "Email".into(),
                    });
                }
                if !is_email(trimmed) {
                    return Some(FieldError::InvalidEmail);
                }
                None
            }
            Rule::Selection { label, options } => {
                let selected = text_of(value);
                if selected.is_empty() || !options.iter().any(|o| o == selected) {
                    return Some(FieldError::NotSelected {
                        label: label.clone(),
                    });
                }
                None
            }
            Rule::Password(policy) => policy.check(text_of(value)),
            Rule::Matches {
                other,
                missing,
                mismatch,
            } => {
                let confirmation = text_of(value);
                if confirmation.is_empty() {
                    return Some(FieldError::Unconfirmed {
                        message: missing.clone(),
                    });
                }
                if values.get(*other).and_then(FieldValue::text) != Some(confirmation) {
                    return Some(FieldError::Mismatch {
                        message: mismatch.clone(),
                    });
                }
                None
            }
            Rule::RequiredFlag { message } => {
                if !flag_of(value) {
                    return Some(FieldError::NotAccepted {
                        message: message.clone(),
                    });
                }
                None
            }
            Rule::Custom { check, .. } => {
                let fallback = FieldValue::default();
                check(value.unwrap_or(&fallback), values)
            }
        }
    }
}

impl<F: FormField> fmt::Debug for Rule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::RequiredText { label } => f.debug_struct("RequiredText").field("label", label).finish(),
            Rule::Present { label } => f.debug_struct("Present").field("label", label).finish(),
            Rule::BoundedText { label, min, max } => f
                .debug_struct("BoundedText")
                .field("label", label)
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::Email => f.write_str("Email"),
            Rule::Selection { label, options } => f
                .debug_struct("Selection")
                .field("label", label)
                .field("options", options)
                .finish(),
            Rule::Password(policy) => f.debug_tuple("Password").field(policy).finish(),
            Rule::Matches { other, .. } => f.debug_struct("Matches").field("other", other).finish(),
            Rule::RequiredFlag { message } => {
                f.debug_struct("RequiredFlag").field("message", message).finish()
            }
            Rule::Custom { depends_on, .. } => f
                .debug_struct("Custom")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// RFC-light email format check (not RFC 5322).
pub fn is_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

fn text_of(value: Option<&FieldValue>) -> &str {
    debug_assert!(
        !matches!(value, Some(FieldValue::Flag(_))),
        "text rule evaluated against a checkbox value"
    );
    value.and_then(FieldValue::text).unwrap_or("")
}

fn flag_of(value: Option<&FieldValue>) -> bool {
    debug_assert!(
        !matches!(value, Some(FieldValue::Text(_))),
        "checkbox rule evaluated against a text value"
    );
    value.and_then(FieldValue::flag).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum Probe {
        Secret,
    }

    impl FormField for Probe {
        const ALL: &'static [Self] = &[Probe::Secret];

        fn name(&self) -> &'static str {
            match self {
                Probe::Secret => "secret",
            }
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    #[test]
    fn email_accepts_simple_addresses() {
        assert!(is_email("user@example.com"));
        assert!(is_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_email("user@example"));
        assert!(!is_email("user example@example.com"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("user@@example.com"));
    }

    #[test]
    fn email_rule_trims_before_checking() {
        let rule = Rule::<Probe>::email();
        let values = FormValues::new();
        assert!(rule.evaluate(Some(&text("  a@b.co  ")), &values).is_none());
        assert_eq!(
            rule.evaluate(Some(&text("   ")), &values),
            Some(FieldError::Required {
                label: "Email".into()
            })
        );
        assert_eq!(
            rule.evaluate(Some(&text("nope")), &values),
            Some(FieldError::InvalidEmail)
        );
    }

    #[test]
    fn bounded_text_uses_trimmed_length() {
        let rule = Rule::<Probe>::bounded("Name", 2, 5);
        let values = FormValues::new();
        assert_eq!(
            rule.evaluate(Some(&text(" a ")), &values),
            Some(FieldError::TooShort {
                label: "Name".into(),
                min: 2
            })
        );
        assert!(rule.evaluate(Some(&text("  ab  ")), &values).is_none());
        assert_eq!(
            rule.evaluate(Some(&text("abcdef")), &values),
            Some(FieldError::TooLong {
                label: "Name".into(),
                max: 5
            })
        );
        assert_eq!(
            rule.evaluate(None, &values),
            Some(FieldError::Required {
                label: "Name".into()
            })
        );
    }

    #[test]
    fn present_counts_whitespace() {
        let rule = Rule::<Probe>::present("Password");
        let values = FormValues::new();
        assert!(rule.evaluate(Some(&text(" ")), &values).is_none());
        assert!(rule.evaluate(Some(&text("")), &values).is_some());
    }

    #[test]
    fn selection_requires_known_option() {
        let rule = Rule::<Probe>::selection("request type", ["a", "b"]);
        let values = FormValues::new();
        assert!(rule.evaluate(Some(&text("a")), &values).is_none());
        assert!(rule.evaluate(Some(&text("")), &values).is_some());
        assert!(rule.evaluate(Some(&text("c")), &values).is_some());
    }

    #[test]
    fn matches_reads_other_field_from_snapshot() {
        let rule = Rule::matches(Probe::Secret, "Please confirm", "Passwords do not match");
        let values = FormValues::new().with(Probe::Secret, "Abc12345!");

        assert!(rule.evaluate(Some(&text("Abc12345!")), &values).is_none());
        assert_eq!(
            rule.evaluate(Some(&text("Abc12345")), &values)
                .unwrap()
                .to_string(),
            "Passwords do not match"
        );
        assert_eq!(
            rule.evaluate(Some(&text("")), &values).unwrap().to_string(),
            "Please confirm"
        );
        assert_eq!(rule.dependencies(), vec![Probe::Secret]);
    }

    #[test]
    fn required_flag_needs_true() {
        let rule = Rule::<Probe>::accepted("You must agree");
        let values = FormValues::new();
        assert!(rule.evaluate(Some(&FieldValue::Flag(true)), &values).is_none());
        assert!(rule.evaluate(Some(&FieldValue::Flag(false)), &values).is_some());
        assert!(rule.evaluate(None, &values).is_some());
    }

    #[test]
    fn custom_rule_sees_snapshot() {
        let rule = Rule::custom(vec![Probe::Secret], |value, values: &FormValues<Probe>| {
            if value.text() == Some(values.text(Probe::Secret)) {
                Some(FieldError::Invalid {
                    message: "must differ".into(),
                })
            } else {
                None
            }
        });
        let values = FormValues::new().with(Probe::Secret, "same");
        assert!(rule.evaluate(Some(&text("same")), &values).is_some());
        assert!(rule.evaluate(Some(&text("other")), &values).is_none());
        assert_eq!(rule.dependencies(), vec![Probe::Secret]);
    }

    #[test]
    fn rules_are_deterministic() {
        let rule = Rule::<Probe>::password(PasswordPolicy::default());
        let values = FormValues::new();
        let value = text("abc");
        assert_eq!(
            rule.evaluate(Some(&value), &values),
            rule.evaluate(Some(&value), &values)
        );
    }
}
