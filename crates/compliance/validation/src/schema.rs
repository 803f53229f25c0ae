use std::collections::{BTreeMap, HashMap};

use crate::error::{FieldError, SchemaError};
use crate::field::{FieldValue, FormField, FormValues};
use crate::rules::Rule;

/// The rule set for one form, with its cross-field dependency graph.
///
/// Every field declared by `F::ALL` carries exactly one rule. The schema
/// precomputes, for each field, the fields whose rules read it, so that a
/// change can re-run exactly the dependents.
#[derive(Debug)]
pub struct FormSchema<F: FormField> {
    rules: Vec<(F, Rule<F>)>,
    dependents: HashMap<F, Vec<F>>,
}

impl<F: FormField> FormSchema<F> {
    pub fn builder() -> FormSchemaBuilder<F> {
        FormSchemaBuilder::new()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.rules.iter().map(|(f, _)| *f)
    }

    pub fn rule(&self, field: F) -> Option<&Rule<F>> {
        self.rules
            .iter()
            .find_map(|(f, rule)| (*f == field).then_some(rule))
    }

    /// Fields whose rules depend on `field`.
    pub fn dependents(&self, field: F) -> &[F] {
        self.dependents
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Validate an explicit value for `field` against the snapshot.
    pub fn validate_value(
        &self,
        field: F,
        value: &FieldValue,
        values: &FormValues<F>,
    ) -> Option<FieldError> {
        let rule = self.rule(field);
        debug_assert!(rule.is_some(), "no rule for field `{}`", field.name());
        rule.and_then(|r| r.evaluate(Some(value), values))
    }

    /// Validate the snapshot's current value for `field`.
    pub fn validate_field(&self, field: F, values: &FormValues<F>) -> Option<FieldError> {
        let rule = self.rule(field);
        debug_assert!(rule.is_some(), "no rule for field `{}`", field.name());
        rule.and_then(|r| r.evaluate(values.get(field), values))
    }

    /// Evaluate every field against the full snapshot. Pure: touches nothing.
    pub fn validate_all(&self, values: &FormValues<F>) -> ValidationReport<F> {
        let errors = self
            .rules
            .iter()
            .filter_map(|(field, rule)| {
                rule.evaluate(values.get(*field), values)
                    .map(|err| (*field, err))
            })
            .collect();
        ValidationReport { errors }
    }
}

/// Builder for [`FormSchema`].
pub struct FormSchemaBuilder<F: FormField> {
    rules: HashMap<F, Rule<F>>,
    duplicate: Option<F>,
}

impl<F: FormField> FormSchemaBuilder<F> {
    fn new() -> Self {
        Self {
            rules: HashMap::new(),
            duplicate: None,
        }
    }

    /// Declare the rule for a field.
    pub fn field(mut self, field: F, rule: Rule<F>) -> Self {
        if self.rules.insert(field, rule).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(field);
        }
        self
    }

    pub fn build(self) -> Result<FormSchema<F>, SchemaError> {
        if let Some(field) = self.duplicate {
            return Err(SchemaError::DuplicateRule(field.name()));
        }

        let mut rules = self.rules;
        let mut ordered = Vec::with_capacity(F::ALL.len());
        for field in F::ALL {
            let rule = rules
                .remove(field)
                .ok_or(SchemaError::MissingRule(field.name()))?;
            ordered.push((*field, rule));
        }
        // Anything left over is a field missing from `F::ALL`.
        if let Some(field) = rules.keys().min() {
            return Err(SchemaError::UnknownField(field.name().to_string()));
        }

        let mut dependents: HashMap<F, Vec<F>> = HashMap::new();
        for (field, rule) in &ordered {
            if let Some(reason) = rule.unsatisfiable() {
                return Err(SchemaError::UnsatisfiableRule {
                    field: field.name(),
                    reason,
                });
            }
            for dependency in rule.dependencies() {
                if dependency == *field {
                    return Err(SchemaError::SelfDependency(field.name()));
                }
                if !F::ALL.contains(&dependency) {
                    return Err(SchemaError::UnknownDependency {
                        field: field.name(),
                        dependency: dependency.name(),
                    });
                }
                let entry = dependents.entry(dependency).or_default();
                if !entry.contains(field) {
                    entry.push(*field);
                }
            }
        }

        Ok(FormSchema {
            rules: ordered,
            dependents,
        })
    }
}

/// Outcome of full-form validation: every failing field, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport<F: FormField> {
    errors: Vec<(F, FieldError)>,
}

impl<F: FormField> ValidationReport<F> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: F) -> Option<&FieldError> {
        self.errors
            .iter()
            .find_map(|(f, err)| (*f == field).then_some(err))
    }

    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.errors.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &FieldError)> {
        self.errors.iter().map(|(f, err)| (*f, err))
    }

    /// Wire name to display message, for the presentation layer.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(f, err)| (f.name(), err.to_string()))
            .collect()
    }
}

/// Validate one field, returning the display message or an empty string.
pub fn validate_field<F: FormField>(
    schema: &FormSchema<F>,
    field: F,
    value: &FieldValue,
    values: &FormValues<F>,
) -> String {
    schema
        .validate_value(field, value, values)
        .map(|err| err.to_string())
        .unwrap_or_default()
}
