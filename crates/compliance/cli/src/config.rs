//! Layered CLI configuration: built-in defaults, then an optional file, then
//! `COMPLIANCE_` environment variables.

use compliance_consent::{ConfirmationConfig, ConsentConfig};
use compliance_forms::forms::{ExportConfig, GdprLimits};
use compliance_validation::PasswordPolicy;
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// Everything the CLI can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registration password policy
    #[serde(default)]
    pub password: PasswordPolicy,

    /// GDPR request form length limits
    #[serde(default)]
    pub gdpr: GdprLimits,

    /// Data export formats
    #[serde(default)]
    pub export: ExportConfig,

    /// Consent categories and initial values
    #[serde(default)]
    pub consent: ConsentConfig,

    /// Destructive-action confirmation
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ComplianceConfig {
    /// Load configuration, layering an optional file and the environment
    /// over the defaults.
    ///
    /// Nested keys use `__` in variable names, e.g.
    /// `COMPLIANCE_CONFIRMATION__EXPECTED_TEXT=ERASE`.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ComplianceConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("COMPLIANCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would leave a form or gate unusable.
    pub fn validate(&self) -> CliResult<()> {
        self.password.validate()?;
        self.gdpr.validate()?;
        self.export.validate()?;
        self.consent.catalog()?;
        self.confirmation.gate()?;
        Ok(())
    }
}
