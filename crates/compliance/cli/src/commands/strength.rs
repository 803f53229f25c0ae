use compliance_validation::{password_strength, PasswordCriteria, PasswordPolicy};
use serde::Serialize;

use super::CommandOutput;
use crate::error::CliResult;

#[derive(Debug, Serialize)]
struct StrengthReport {
    score: u8,
    label: Option<String>,
    meter: f64,
    criteria: PasswordCriteria,
    /// Message the registration form would show, if any.
    error: Option<String>,
}

/// Advisory score plus the pass/fail verdict of the policy. Always succeeds;
/// a weak password is not a command failure.
pub fn execute(password: &str, policy: &PasswordPolicy) -> CliResult<CommandOutput> {
    let strength = password_strength(password, policy);
    let report = StrengthReport {
        score: strength.score,
        label: strength.label.map(|l| l.to_string()),
        meter: strength.fraction(),
        criteria: policy.criteria(password),
        error: policy.check(password).map(|e| e.to_string()),
    };
    Ok(CommandOutput::ok(serde_json::to_value(&report)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_label_and_first_error() {
        let output = execute("abc", &PasswordPolicy::default()).unwrap();
        let body = output.body.unwrap();
        assert_eq!(body["score"], 1);
        assert_eq!(body["label"], "Very Weak");
        assert_eq!(body["error"], "Password must be at least 8 characters");
    }

    #[test]
    fn strong_password_has_no_error() {
        let output = execute("Abc12345!", &PasswordPolicy::default()).unwrap();
        let body = output.body.unwrap();
        assert_eq!(body["score"], 5);
        assert_eq!(body["label"], "Strong");
        assert!(body["error"].is_null());
    }
}
