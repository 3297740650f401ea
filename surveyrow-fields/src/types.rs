//! Core option and field types for dynamic-label rows.
//!
//! An [`OptionDefinition`] describes one possible shape of a row: a single
//! labeled field or an ordered group of labeled fields. A [`FieldSetState`]
//! is the live list of (label, value) pairs built from the active option.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label → value mapping exchanged with the data delegate.
///
/// Insertion order is the key order used for option matching.
pub type ValueMapping = IndexMap<String, String>;

/// One selectable option set for a row.
///
/// Serializes untagged, so a survey document writes `"Age"` for a simple
/// option and `["Feet", "Inches"]` for a composite one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionDefinition {
    /// Exactly one labeled field.
    Simple(String),
    /// Two or more labeled fields, order-significant.
    Composite(Vec<String>),
}

impl OptionDefinition {
    pub fn simple(label: impl Into<String>) -> Self {
        Self::Simple(label.into())
    }

    pub fn composite<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Composite(labels.into_iter().map(Into::into).collect())
    }

    /// Labels in display order.
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Simple(label) => std::slice::from_ref(label),
            Self::Composite(labels) => labels,
        }
    }

    /// Title shown in the option picker.
    pub fn title(&self) -> String {
        self.labels().join(", ")
    }

    pub fn field_count(&self) -> usize {
        self.labels().len()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.labels().iter().any(|l| l == label)
    }

    pub(crate) fn label_set(&self) -> BTreeSet<&str> {
        self.labels().iter().map(String::as_str).collect()
    }
}

/// Category grouping for rows that share a remembered default.
///
/// `types[i]` is the symbolic name of the catalog's `i`-th option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub id: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl CategoryMetadata {
    pub fn new<I, S>(id: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn position_of(&self, type_name: &str) -> Option<usize> {
        self.types.iter().position(|t| t == type_name)
    }
}

/// A single labeled input in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// Live field list for one row instance.
///
/// `fields` always holds one entry per label of `active_option`, in the
/// option's order. Changing the option replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetState {
    active_option: OptionDefinition,
    fields: Vec<FieldEntry>,
}

impl FieldSetState {
    /// Build a field list for `option` with every value empty.
    pub fn blank(option: OptionDefinition) -> Self {
        let fields = option
            .labels()
            .iter()
            .map(|label| FieldEntry {
                label: label.clone(),
                value: String::new(),
            })
            .collect();
        Self {
            active_option: option,
            fields,
        }
    }

    /// Build a field list for `option`, taking each value from `values`.
    pub fn with_values(option: OptionDefinition, values: &ValueMapping) -> Self {
        let fields = option
            .labels()
            .iter()
            .map(|label| FieldEntry {
                label: label.clone(),
                value: values.get(label).cloned().unwrap_or_default(),
            })
            .collect();
        Self {
            active_option: option,
            fields,
        }
    }

    pub fn active_option(&self) -> &OptionDefinition {
        &self.active_option
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    /// Update one value in place. Returns `false` when `label` is not present.
    pub fn set_value(&mut self, label: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.label == label) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Current values keyed by label, in field order.
    pub fn values(&self) -> ValueMapping {
        self.fields
            .iter()
            .map(|f| (f.label.clone(), f.value.clone()))
            .collect()
    }
}
