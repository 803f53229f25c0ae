use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A typed field identifier.
///
/// Each form declares its fields as a plain `enum` implementing this trait,
/// so that rule lookup is a typed match rather than a string switch.
pub trait FormField: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Every field of the form, in declaration order.
    const ALL: &'static [Self];

    /// Wire name of the field (e.g. `confirmPassword`).
    fn name(&self) -> &'static str;

    /// Resolve a wire name back to a field.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Raw user input for one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state
    Flag(bool),
    /// Text input, select value or textarea content
    Text(String),
}

impl FieldValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Snapshot of every field value in a form.
///
/// Fields with no entry read as empty text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues<F: FormField> {
    values: HashMap<F, FieldValue>,
}

impl<F: FormField> FormValues<F> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: F, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: F, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: F) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Text content of a field; empty when unset or not a text field.
    pub fn text(&self, field: F) -> &str {
        self.values
            .get(&field)
            .and_then(FieldValue::text)
            .unwrap_or("")
    }

    /// Checkbox state of a field; `false` when unset or not a flag field.
    pub fn flag(&self, field: F) -> bool {
        self.values
            .get(&field)
            .and_then(FieldValue::flag)
            .unwrap_or(false)
    }

    /// Build a snapshot from wire names, rejecting names the form does not declare.
    pub fn from_named<I, K>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let mut values = Self::new();
        for (name, value) in entries {
            let field = F::from_name(name.as_ref())
                .ok_or_else(|| SchemaError::UnknownField(name.as_ref().to_string()))?;
            values.set(field, value);
        }
        Ok(values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &FieldValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

impl<F: FormField> Default for FormValues<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum Probe {
        Name,
        Agree,
    }

    impl FormField for Probe {
        const ALL: &'static [Self] = &[Probe::Name, Probe::Agree];

        fn name(&self) -> &'static str {
            match self {
                Probe::Name => "name",
                Probe::Agree => "agree",
            }
        }
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let values = FormValues::<Probe>::new();
        assert_eq!(values.text(Probe::Name), "");
        assert!(!values.flag(Probe::Agree));
        assert!(values.get(Probe::Name).is_none());
    }

    #[test]
    fn from_name_resolves_declared_fields() {
        assert_eq!(Probe::from_name("agree"), Some(Probe::Agree));
        assert_eq!(Probe::from_name("Agree"), None);
    }

    #[test]
    fn from_named_rejects_unknown_names() {
        let ok = FormValues::<Probe>::from_named(vec![
            ("name", FieldValue::from("Ada")),
            ("agree", FieldValue::from(true)),
        ])
        .unwrap();
        assert_eq!(ok.text(Probe::Name), "Ada");
        assert!(ok.flag(Probe::Agree));

        let err = FormValues::<Probe>::from_named(vec![("nickname", FieldValue::from("x"))])
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownField("nickname".into()));
    }

    #[test]
    fn field_value_deserializes_untagged() {
        let flag: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(flag, FieldValue::Flag(true));

        let text: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, FieldValue::Text("hello".into()));
    }
}
