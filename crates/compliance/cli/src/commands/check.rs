//! `compliance check`: validate a JSON snapshot against one of the forms.

use std::collections::BTreeMap;
use std::path::Path;

use compliance_forms::forms::{DataExportForm, GdprRequestForm, LoginForm, RegisterForm};
use compliance_forms::FormKind;
use compliance_validation::{FieldValue, FormField, FormSchema, FormValues, Rule};
use serde::Serialize;
use tracing::debug;

use super::CommandOutput;
use crate::config::ComplianceConfig;
use crate::error::{CliError, CliResult};

/// Forms the CLI knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormName {
    Register,
    Gdpr,
    Login,
    Export,
}

/// Raw `{"field": value}` object as read from disk.
pub type NamedValues = BTreeMap<String, FieldValue>;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub form: &'static str,
    pub valid: bool,
    pub errors: BTreeMap<&'static str, String>,
}

pub fn read_values(path: &Path) -> CliResult<NamedValues> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn execute(form: FormName, values: &Path, config: &ComplianceConfig) -> CliResult<CommandOutput> {
    let named = read_values(values)?;
    let report = match form {
        FormName::Register => check(&RegisterForm::new(config.password.clone()), named)?,
        FormName::Gdpr => check(&GdprRequestForm::new(config.gdpr.clone()), named)?,
        FormName::Login => check(&LoginForm, named)?,
        FormName::Export => check(&DataExportForm::new(config.export.clone()), named)?,
    };

    let success = report.valid;
    let body = serde_json::to_value(&report)?;
    Ok(if success {
        CommandOutput::ok(body)
    } else {
        CommandOutput::failed(body)
    })
}

fn check<K: FormKind>(kind: &K, named: NamedValues) -> CliResult<CheckReport> {
    let schema = kind.schema()?;
    let values = snapshot(kind, &schema, named)?;
    let report = schema.validate_all(&values);
    debug!(form = K::NAME, errors = report.len(), "Snapshot validated");

    Ok(CheckReport {
        form: K::NAME,
        valid: report.is_valid(),
        errors: report.messages(),
    })
}

/// Overlay user-supplied values on the form's initial values, rejecting
/// unknown field names and values of the wrong kind.
pub fn snapshot<K: FormKind>(
    kind: &K,
    schema: &FormSchema<K::Field>,
    named: NamedValues,
) -> CliResult<FormValues<K::Field>> {
    let provided = FormValues::<K::Field>::from_named(named)?;
    let mut values = kind.initial_values();
    for (field, value) in provided.iter() {
        check_kind(schema, field, value)?;
        values.set(field, value.clone());
    }
    Ok(values)
}

fn check_kind<F: FormField>(schema: &FormSchema<F>, field: F, value: &FieldValue) -> CliResult<()> {
    let wants_flag = matches!(schema.rule(field), Some(Rule::RequiredFlag { .. }));
    match (wants_flag, value) {
        (true, FieldValue::Text(_)) => Err(CliError::ValueKind {
            field: field.name(),
            expected: "a boolean",
        }),
        (false, FieldValue::Flag(_)) => Err(CliError::ValueKind {
            field: field.name(),
            expected: "a string",
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_forms::forms::RegisterField;

    fn named(pairs: &[(&str, FieldValue)]) -> NamedValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_register_snapshot_reports_four_errors() {
        let report = check(&RegisterForm::default(), NamedValues::new()).unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 4);
        assert_eq!(report.form, "register");
    }

    #[test]
    fn export_uses_default_format() {
        let report = check(&DataExportForm::default(), NamedValues::new()).unwrap();
        assert!(report.valid);
    }

    #[test]
    fn wrong_value_kind_is_rejected() {
        let form = RegisterForm::default();
        let schema = form.schema().unwrap();

        let err = snapshot(&form, &schema, named(&[("consent", "yes".into())])).unwrap_err();
        assert!(matches!(err, CliError::ValueKind { field: "consent", .. }));

        let err = snapshot(&form, &schema, named(&[("email", true.into())])).unwrap_err();
        assert!(matches!(err, CliError::ValueKind { field: "email", .. }));

        let values = snapshot(&form, &schema, named(&[("consent", true.into())])).unwrap();
        assert!(values.flag(RegisterField::Consent));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = check(&LoginForm, named(&[("username", "ada".into())])).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }
}
