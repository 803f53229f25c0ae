use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConsentError;

/// Identifier of a consent category (`necessary`, `analytics`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for CategoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A purpose the user can consent to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentCategory {
    pub id: CategoryId,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Pinned to granted; grant and withdraw are no-ops.
    #[serde(default)]
    pub required: bool,
}

impl ConsentCategory {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            label: label.into(),
            description: String::new(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Validated, ordered set of consent categories.
///
/// Holds at least one required category and no duplicate ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCatalog {
    categories: Vec<ConsentCategory>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<ConsentCategory>) -> Result<Self, ConsentError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if category.id.as_str().is_empty() {
                return Err(ConsentError::EmptyCategoryId);
            }
            if !seen.insert(category.id.clone()) {
                return Err(ConsentError::DuplicateCategory(category.id.clone()));
            }
        }
        if !categories.iter().any(|c| c.required) {
            return Err(ConsentError::NoRequiredCategory);
        }
        Ok(Self { categories })
    }

    /// The cookie banner set: `necessary` (required), `analytics`, `marketing`.
    pub fn cookies() -> Self {
        Self {
            categories: default_cookie_categories(),
        }
    }

    pub fn categories(&self) -> &[ConsentCategory] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&ConsentCategory> {
        self.categories.iter().find(|c| c.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.required)
    }

    /// Look up a category by user-supplied id.
    pub fn resolve(&self, id: &str) -> Result<&CategoryId, ConsentError> {
        self.get(id)
            .map(|c| &c.id)
            .ok_or_else(|| ConsentError::UnknownCategory(id.to_string()))
    }
}

pub(crate) fn default_cookie_categories() -> Vec<ConsentCategory> {
    vec![
        ConsentCategory::new("necessary", "Necessary")
            .with_description("Required for the site to function. Always active.")
            .required(),
        ConsentCategory::new("analytics", "Analytics")
            .with_description("Help us understand how the site is used."),
        ConsentCategory::new("marketing", "Marketing")
            .with_description("Used to show relevant advertising."),
    ]
}
