//! Data subject request form (access, deletion, portability, ...).

use std::fmt;

use chrono::{DateTime, Utc};
use compliance_validation::{FormField, FormSchema, FormValues, Rule, SchemaError};
use serde::{Deserialize, Serialize};

use crate::kind::FormKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GdprField {
    Name,
    Email,
    RequestType,
    Message,
}

impl FormField for GdprField {
    const ALL: &'static [Self] = &[
        GdprField::Name,
        GdprField::Email,
        GdprField::RequestType,
        GdprField::Message,
    ];

    fn name(&self) -> &'static str {
        match self {
            GdprField::Name => "name",
            GdprField::Email => "email",
            GdprField::RequestType => "requestType",
            GdprField::Message => "message",
        }
    }
}

/// Kind of data subject request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestType {
    DataAccess,
    DataDeletion,
    DataPortability,
    DataCorrection,
    ConsentWithdrawal,
    Other,
}

impl RequestType {
    pub const ALL: &'static [RequestType] = &[
        RequestType::DataAccess,
        RequestType::DataDeletion,
        RequestType::DataPortability,
        RequestType::DataCorrection,
        RequestType::ConsentWithdrawal,
        RequestType::Other,
    ];

    /// Wire value used in the select and the payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::DataAccess => "data-access",
            RequestType::DataDeletion => "data-deletion",
            RequestType::DataPortability => "data-portability",
            RequestType::DataCorrection => "data-correction",
            RequestType::ConsentWithdrawal => "consent-withdrawal",
            RequestType::Other => "other",
        }
    }

    /// Human-readable option label.
    pub fn label(&self) -> &'static str {
        match self {
            RequestType::DataAccess => "Data Access Request",
            RequestType::DataDeletion => "Data Deletion Request",
            RequestType::DataPortability => "Data Portability Request",
            RequestType::DataCorrection => "Data Correction Request",
            RequestType::ConsentWithdrawal => "Consent Withdrawal",
            RequestType::Other => "Other GDPR-related request",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length limits of the request form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdprLimits {
    #[serde(default = "default_name_min")]
    pub name_min: usize,
    #[serde(default = "default_name_max")]
    pub name_max: usize,
    #[serde(default = "default_message_min")]
    pub message_min: usize,
    #[serde(default = "default_message_max")]
    pub message_max: usize,
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    100
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    2000
}

impl GdprLimits {
    pub fn validate(&self) -> Result<(), SchemaError> {
        let bounds = [
            ("name", self.name_min, self.name_max),
            ("message", self.message_min, self.message_max),
        ];
        for (field, min, max) in bounds {
            if min > max {
                return Err(SchemaError::InvalidConfiguration {
                    reason: format!("{field} minimum length {min} exceeds maximum length {max}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for GdprLimits {
    fn default() -> Self {
        Self {
            name_min: default_name_min(),
            name_max: default_name_max(),
            message_min: default_message_min(),
            message_max: default_message_max(),
        }
    }
}

/// Values a request form can be pre-filled with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprInitialData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub request_type: Option<RequestType>,
    #[serde(default)]
    pub message: String,
}

/// GDPR support request form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GdprRequestForm {
    pub limits: GdprLimits,
    pub initial: GdprInitialData,
}

impl GdprRequestForm {
    pub fn new(limits: GdprLimits) -> Self {
        Self {
            limits,
            initial: GdprInitialData::default(),
        }
    }

    pub fn with_initial(mut self, initial: GdprInitialData) -> Self {
        self.initial = initial;
        self
    }

    /// Character counter shown under the message box, e.g. `42/2000`.
    ///
    /// Counts the raw text, not the trimmed one.
    pub fn message_counter(&self, message: &str) -> String {
        format!("{}/{}", message.chars().count(), self.limits.message_max)
    }
}

impl FormKind for GdprRequestForm {
    type Field = GdprField;
    type Payload = GdprRequestPayload;

    const NAME: &'static str = "gdpr_request";

    fn schema(&self) -> Result<FormSchema<GdprField>, SchemaError> {
        self.limits.validate()?;
        FormSchema::builder()
            .field(
                GdprField::Name,
                Rule::bounded("Name", self.limits.name_min, self.limits.name_max),
            )
            .field(GdprField::Email, Rule::email())
            .field(
                GdprField::RequestType,
                Rule::selection("request type", RequestType::ALL.iter().map(|t| t.as_str())),
            )
            .field(
                GdprField::Message,
                Rule::bounded(
                    "Message",
                    self.limits.message_min,
                    self.limits.message_max,
                ),
            )
            .build()
    }

    fn initial_values(&self) -> FormValues<GdprField> {
        FormValues::new()
            .with(GdprField::Name, self.initial.name.as_str())
            .with(GdprField::Email, self.initial.email.as_str())
            .with(
                GdprField::RequestType,
                self.initial.request_type.map(|t| t.as_str()).unwrap_or(""),
            )
            .with(GdprField::Message, self.initial.message.as_str())
    }

    fn payload(&self, values: &FormValues<GdprField>, submitted_at: DateTime<Utc>) -> GdprRequestPayload {
        GdprRequestPayload {
            name: values.text(GdprField::Name).trim().to_string(),
            email: values.text(GdprField::Email).trim().to_string(),
            // Validation guarantees a known option.
            request_type: RequestType::parse(values.text(GdprField::RequestType))
                .unwrap_or(RequestType::Other),
            message: values.text(GdprField::Message).trim().to_string(),
            timestamp: submitted_at,
        }
    }
}

/// Sanitized data subject request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprRequestPayload {
    pub name: String,
    pub email: String,
    pub request_type: RequestType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
