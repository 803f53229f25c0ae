//! `compliance submit`: run a snapshot through the submission controller and
//! emit the sanitized payload as one JSON line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use compliance_forms::forms::{DataExportForm, GdprRequestForm, LoginForm, RegisterForm};
use compliance_forms::{FormController, FormKind, SubmitHandler, SubmitOutcome};
use serde::Serialize;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::check::{read_values, snapshot, FormName, NamedValues};
use super::CommandOutput;
use crate::config::ComplianceConfig;
use crate::error::{CliError, CliResult};

/// Submit collaborator writing payloads as JSON lines to a file or stdout.
pub struct JsonLinesSink {
    path: Option<PathBuf>,
}

impl JsonLinesSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl<P: Serialize + Send + 'static> SubmitHandler<P> for JsonLinesSink {
    type Error = std::io::Error;

    async fn submit(&self, payload: P) -> Result<(), Self::Error> {
        let mut line = serde_json::to_vec(&payload).map_err(std::io::Error::other)?;
        line.push(b'\n');

        match &self.path {
            Some(path) => {
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(&line).await?;
                file.flush().await
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&line).await?;
                stdout.flush().await
            }
        }
    }
}

pub async fn execute(
    form: FormName,
    values: &Path,
    output: Option<PathBuf>,
    config: &ComplianceConfig,
) -> CliResult<CommandOutput> {
    let named = read_values(values)?;
    let sink = JsonLinesSink::new(output);
    match form {
        FormName::Register => submit(RegisterForm::new(config.password.clone()), named, &sink).await,
        FormName::Gdpr => submit(GdprRequestForm::new(config.gdpr.clone()), named, &sink).await,
        FormName::Login => submit(LoginForm, named, &sink).await,
        FormName::Export => submit(DataExportForm::new(config.export.clone()), named, &sink).await,
    }
}

async fn submit<K: FormKind>(
    kind: K,
    named: NamedValues,
    sink: &JsonLinesSink,
) -> CliResult<CommandOutput> {
    let schema = kind.schema()?;
    let values = snapshot(&kind, &schema, named)?;

    let controller = FormController::new(kind)?;
    for (field, value) in values.iter() {
        controller.set_value(field, value.clone());
    }

    match controller.submit(sink).await.map_err(CliError::Output)? {
        SubmitOutcome::Submitted => {
            info!(form = K::NAME, "Payload written");
            Ok(CommandOutput {
                body: None,
                success: true,
            })
        }
        SubmitOutcome::Invalid(report) => Ok(CommandOutput::failed(json!({
            "form": K::NAME,
            "valid": false,
            "errors": report.messages(),
        }))),
        SubmitOutcome::Dropped(reason) => Ok(CommandOutput::failed(json!({
            "form": K::NAME,
            "dropped": reason,
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_validation::FieldValue;

    #[tokio::test]
    async fn valid_login_is_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("payloads.jsonl");
        let sink = JsonLinesSink::new(Some(out.clone()));

        let named: NamedValues = [
            ("email".to_string(), FieldValue::from(" ada@example.com ")),
            ("password".to_string(), FieldValue::from("hunter2")),
        ]
        .into_iter()
        .collect();

        let output = submit(LoginForm, named, &sink).await.unwrap();
        assert!(output.success);
        assert!(output.body.is_none());

        let written = std::fs::read_to_string(&out).unwrap();
        let payload: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(payload["email"], "ada@example.com");
        assert_eq!(payload["password"], "hunter2");
        assert!(payload["timestamp"].is_string());
    }

    #[tokio::test]
    async fn invalid_snapshot_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("payloads.jsonl");
        let sink = JsonLinesSink::new(Some(out.clone()));

        let output = submit(RegisterForm::default(), NamedValues::new(), &sink)
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(
            output.body.unwrap()["errors"]["consent"],
            "You must agree to the privacy policy to register"
        );
        assert!(!out.exists());
    }
}
