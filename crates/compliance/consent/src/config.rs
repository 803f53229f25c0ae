//! Serde configuration for consent catalogs and confirmation gates.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::category::{default_cookie_categories, CategoryCatalog, ConsentCategory};
use crate::confirmation::{ConfirmationGate, ConfirmationMode};
use crate::error::{ConfirmationError, ConsentError};
use crate::record::ConsentRecord;

/// Consent categories and initial values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    #[serde(default = "default_cookie_categories")]
    pub categories: Vec<ConsentCategory>,
    /// Starting values for optional categories.
    #[serde(default)]
    pub initial: BTreeMap<String, bool>,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            categories: default_cookie_categories(),
            initial: BTreeMap::new(),
        }
    }
}

impl ConsentConfig {
    pub fn catalog(&self) -> Result<CategoryCatalog, ConsentError> {
        CategoryCatalog::new(self.categories.clone())
    }

    /// A fresh record over the configured catalog.
    pub fn record(&self) -> Result<ConsentRecord, ConsentError> {
        let catalog = Arc::new(self.catalog()?);
        Ok(ConsentRecord::new(
            catalog,
            self.initial.iter().map(|(id, granted)| (id.as_str(), *granted)),
        ))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    #[default]
    ExactText,
    Acknowledgement,
}

/// Destructive-action confirmation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default)]
    pub kind: ConfirmationKind,
    /// Text to type in `exact_text` mode (default: `DELETE`)
    #[serde(default = "default_expected_text")]
    pub expected_text: String,
}

fn default_expected_text() -> String {
    "DELETE".to_string()
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            kind: ConfirmationKind::default(),
            expected_text: default_expected_text(),
        }
    }
}

impl ConfirmationConfig {
    pub fn mode(&self) -> ConfirmationMode {
        match self.kind {
            ConfirmationKind::ExactText => ConfirmationMode::exact_text(self.expected_text.clone()),
            ConfirmationKind::Acknowledgement => ConfirmationMode::Acknowledgement,
        }
    }

    pub fn gate(&self) -> Result<ConfirmationGate, ConfirmationError> {
        ConfirmationGate::new(self.mode())
    }
}
