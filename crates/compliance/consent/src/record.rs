use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::category::{CategoryCatalog, CategoryId};

/// Category id to granted flag. This is what collaborators persist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsentPreferences(BTreeMap<CategoryId, bool>);

impl ConsentPreferences {
    /// Granted state of a category; `false` when absent.
    pub fn get(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, bool)> {
        self.0.iter().map(|(id, granted)| (id, *granted))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CategoryId, bool)> for ConsentPreferences {
    fn from_iter<I: IntoIterator<Item = (CategoryId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentAction {
    Grant,
    Withdraw,
}

impl ConsentAction {
    pub fn granted(&self) -> bool {
        matches!(self, ConsentAction::Grant)
    }
}

impl From<bool> for ConsentAction {
    fn from(granted: bool) -> Self {
        if granted {
            ConsentAction::Grant
        } else {
            ConsentAction::Withdraw
        }
    }
}

/// Result of a single-category mutation, handed to the persistence
/// collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentChange {
    pub category: CategoryId,
    pub action: ConsentAction,
    /// Full record after the change.
    pub record: ConsentPreferences,
}

/// Per-user consent state over a category catalog.
///
/// Required categories are granted at construction and never change.
/// Everything else moves only through [`set_consent`](Self::set_consent)
/// (and the helpers built on it) or the bulk operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentRecord {
    catalog: Arc<CategoryCatalog>,
    preferences: ConsentPreferences,
}

impl ConsentRecord {
    /// Required categories start granted, the rest from `initial` or `false`.
    pub fn new<I, K>(catalog: Arc<CategoryCatalog>, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut values: BTreeMap<CategoryId, bool> = catalog
            .categories()
            .iter()
            .map(|c| (c.id.clone(), c.required))
            .collect();

        for (id, granted) in initial {
            let id = id.as_ref();
            match catalog.get(id) {
                Some(category) if category.required => {}
                Some(category) => {
                    values.insert(category.id.clone(), granted);
                }
                None => warn!(category = id, "Ignoring initial value for unknown consent category"),
            }
        }

        Self {
            catalog,
            preferences: ConsentPreferences(values),
        }
    }

    /// Fresh record with only required categories granted.
    pub fn with_defaults(catalog: Arc<CategoryCatalog>) -> Self {
        Self::new(catalog, std::iter::empty::<(&str, bool)>())
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &ConsentPreferences {
        &self.preferences
    }

    pub fn is_granted(&self, id: &str) -> bool {
        self.preferences.get(id)
    }

    /// The single consent mutation.
    ///
    /// Returns `None` for required categories (pinned) and for ids outside
    /// the catalog, which are a caller bug.
    pub fn set_consent(&mut self, id: &str, granted: bool) -> Option<ConsentChange> {
        debug_assert!(
            self.catalog.contains(id),
            "unknown consent category `{id}`"
        );
        let Some(category) = self.catalog.get(id) else {
            warn!(category = id, "Consent change for unknown category ignored");
            return None;
        };
        if category.required {
            debug!(category = id, "Required category is pinned; change ignored");
            return None;
        }

        let category = category.id.clone();
        self.preferences.0.insert(category.clone(), granted);
        let action = ConsentAction::from(granted);
        info!(category = %category, ?action, "Consent updated");

        Some(ConsentChange {
            category,
            action,
            record: self.preferences.clone(),
        })
    }

    pub fn grant(&mut self, id: &str) -> Option<ConsentChange> {
        self.set_consent(id, true)
    }

    pub fn withdraw(&mut self, id: &str) -> Option<ConsentChange> {
        self.set_consent(id, false)
    }

    pub fn toggle(&mut self, id: &str) -> Option<ConsentChange> {
        let next = !self.is_granted(id);
        self.set_consent(id, next)
    }

    /// Grant every optional category.
    pub fn accept_all(&mut self) -> ConsentPreferences {
        self.set_optional(true)
    }

    /// Withdraw every optional category.
    pub fn reject_all(&mut self) -> ConsentPreferences {
        self.set_optional(false)
    }

    fn set_optional(&mut self, granted: bool) -> ConsentPreferences {
        let values = self
            .catalog
            .categories()
            .iter()
            .map(|c| (c.id.clone(), c.required || granted))
            .collect();
        self.preferences = ConsentPreferences(values);
        info!(granted, "All optional consent categories updated");
        self.preferences.clone()
    }
}
