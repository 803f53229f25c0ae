use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, SchemaError};

/// Character classes a strong password must contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Lowercase => write!(f, "lowercase letter"),
            CharClass::Uppercase => write!(f, "uppercase letter"),
            CharClass::Digit => write!(f, "number"),
        }
    }
}

/// Password strength policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum length in characters (default: 8)
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// At least one of these must appear (default: `!@#$%^&*`)
    #[serde(default = "default_special_characters")]
    pub special_characters: String,
}

fn default_min_length() -> usize {
    8
}

fn default_special_characters() -> String {
    "!@#$%^&*".to_string()
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            special_characters: default_special_characters(),
        }
    }
}

/// Which of the five strength predicates a password satisfies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCriteria {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordCriteria {
    /// Number of satisfied predicates (0-5).
    pub fn satisfied(&self) -> u8 {
        [
            self.length,
            self.lowercase,
            self.uppercase,
            self.digit,
            self.special,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8
    }

    pub fn all(&self) -> bool {
        self.satisfied() == 5
    }
}

impl PasswordPolicy {
    /// Reject a policy no password can satisfy.
    pub fn validate(&self) -> Result<(), SchemaError> {
        match self.unsatisfiable() {
            Some(reason) => Err(SchemaError::InvalidConfiguration {
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn unsatisfiable(&self) -> Option<&'static str> {
        self.special_characters
            .is_empty()
            .then_some("password policy has no special characters to choose from")
    }

    pub fn criteria(&self, password: &str) -> PasswordCriteria {
        PasswordCriteria {
            length: password.chars().count() >= self.min_length,
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password
                .chars()
                .any(|c| self.special_characters.contains(c)),
        }
    }

    /// First unmet requirement, checked in the order length, lowercase,
    /// uppercase, digit, special.
    pub fn check(&self, password: &str) -> Option<FieldError> {
        if password.is_empty() {
            return Some(FieldError::Required {
                label: "Password".into(),
            });
        }

        let criteria = self.criteria(password);
        if !criteria.length {
            return Some(FieldError::TooShort {
                label: "Password".into(),
                min: self.min_length,
            });
        }
        if !criteria.lowercase {
            return Some(FieldError::MissingCharacter {
                class: CharClass::Lowercase,
            });
        }
        if !criteria.uppercase {
            return Some(FieldError::MissingCharacter {
                class: CharClass::Uppercase,
            });
        }
        if !criteria.digit {
            return Some(FieldError::MissingCharacter {
                class: CharClass::Digit,
            });
        }
        if !criteria.special {
            return Some(FieldError::MissingSpecial {
                set: self.special_characters.clone(),
            });
        }
        None
    }
}

/// Advisory label shown next to the strength meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Fair => "Fair",
            StrengthLabel::Good => "Good",
            StrengthLabel::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Strength score for UI feedback. Never decides pass/fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// Satisfied predicates, 0-5
    pub score: u8,
    /// `None` for an empty password
    pub label: Option<StrengthLabel>,
}

impl PasswordStrength {
    /// Fill fraction of the strength meter (0.0-1.0).
    pub fn fraction(&self) -> f64 {
        f64::from(self.score) / 5.0
    }
}

/// Score a password against a policy.
pub fn password_strength(password: &str, policy: &PasswordPolicy) -> PasswordStrength {
    let score = policy.criteria(password).satisfied();
    let label = match score {
        0 => None,
        1 => Some(StrengthLabel::VeryWeak),
        2 => Some(StrengthLabel::Weak),
        3 => Some(StrengthLabel::Fair),
        4 => Some(StrengthLabel::Good),
        _ => Some(StrengthLabel::Strong),
    };
    PasswordStrength { score, label }
}
