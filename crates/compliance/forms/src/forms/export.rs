use chrono::{DateTime, Utc};
use compliance_validation::{FormField, FormSchema, FormValues, Rule, SchemaError};
use serde::{Deserialize, Serialize};

use crate::kind::FormKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportField {
    Format,
}

impl FormField for ExportField {
    const ALL: &'static [Self] = &[ExportField::Format];

    fn name(&self) -> &'static str {
        match self {
            ExportField::Format => "format",
        }
    }
}

/// Formats offered by the data export form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string(), "csv".to_string()]
}

fn default_format() -> String {
    "json".to_string()
}

impl ExportConfig {
    /// The default format must be one of the offered ones.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.formats.is_empty() {
            return Err(SchemaError::InvalidConfiguration {
                reason: "no export formats configured".to_string(),
            });
        }
        if !self.formats.contains(&self.default_format) {
            return Err(SchemaError::InvalidConfiguration {
                reason: format!(
                    "default export format `{}` is not one of {:?}",
                    self.default_format, self.formats
                ),
            });
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            default_format: default_format(),
        }
    }
}

/// Personal data export request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataExportForm {
    pub config: ExportConfig,
}

impl DataExportForm {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl FormKind for DataExportForm {
    type Field = ExportField;
    type Payload = ExportRequestPayload;

    const NAME: &'static str = "data_export";

    fn schema(&self) -> Result<FormSchema<ExportField>, SchemaError> {
        self.config.validate()?;
        FormSchema::builder()
            .field(
                ExportField::Format,
                Rule::selection("format", self.config.formats.iter().cloned()),
            )
            .build()
    }

    fn initial_values(&self) -> FormValues<ExportField> {
        FormValues::new().with(ExportField::Format, self.config.default_format.as_str())
    }

    fn payload(
        &self,
        values: &FormValues<ExportField>,
        submitted_at: DateTime<Utc>,
    ) -> ExportRequestPayload {
        ExportRequestPayload {
            format: values.text(ExportField::Format).to_string(),
            timestamp: submitted_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequestPayload {
    pub format: String,
    pub timestamp: DateTime<Utc>,
}
