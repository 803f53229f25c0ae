use std::path::PathBuf;

use compliance_consent::{ConfirmationError, ConsentError};
use compliance_validation::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Consent(#[from] ConsentError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),

    #[error("field `{field}` expects {expected}")]
    ValueKind {
        field: &'static str,
        expected: &'static str,
    },

    #[error("failed to write payload: {0}")]
    Output(#[source] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
