//! OptionCatalog, the immutable set of options one row can show.
//!
//! A catalog is validated once at construction and shared between the
//! controllers configured from it. Matching maps the key set of an incoming
//! value onto the option whose labels produce exactly those keys.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{FieldSetError, Result};
use crate::types::{CategoryMetadata, OptionDefinition};

/// How composite options are compared against incoming keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Keys must list the composite's labels in the same order.
    #[default]
    Ordered,
    /// Keys must contain the composite's labels in any order.
    Unordered,
}

/// Ordered option definitions plus optional category metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCatalog {
    definitions: Vec<OptionDefinition>,
    metadata: Option<CategoryMetadata>,
    policy: MatchPolicy,
}

impl OptionCatalog {
    /// Validate and build a catalog.
    ///
    /// An empty definition list is accepted here; controllers report it when
    /// they are configured with it.
    pub fn new(
        definitions: Vec<OptionDefinition>,
        metadata: Option<CategoryMetadata>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            validate_definition(def)?;
            if !seen.insert(def.label_set()) {
                return Err(FieldSetError::DuplicateLabelSet { title: def.title() });
            }
        }

        if let Some(meta) = &metadata {
            if meta.types.len() != definitions.len() {
                return Err(FieldSetError::MetadataMismatch {
                    types: meta.types.len(),
                    definitions: definitions.len(),
                });
            }
        }

        debug!(
            options = definitions.len(),
            category = metadata.as_ref().map(|m| m.id.as_str()),
            "option catalog built"
        );

        Ok(Self {
            definitions,
            metadata,
            policy: MatchPolicy::default(),
        })
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn definitions(&self) -> &[OptionDefinition] {
        &self.definitions
    }

    pub fn metadata(&self) -> Option<&CategoryMetadata> {
        self.metadata.as_ref()
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn get(&self, index: usize) -> Option<&OptionDefinition> {
        self.definitions.get(index)
    }

    /// Position of `option` in the catalog.
    pub fn position(&self, option: &OptionDefinition) -> Option<usize> {
        self.definitions.iter().position(|d| d == option)
    }

    /// Picker titles for every option, in catalog order.
    pub fn titles(&self) -> Vec<String> {
        self.definitions.iter().map(OptionDefinition::title).collect()
    }

    /// Symbolic type name of the option at `index`, when metadata is present.
    pub fn type_name(&self, index: usize) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.types.get(index))
            .map(String::as_str)
    }

    /// Find the option whose labels equal `keys`.
    ///
    /// A single key matches a simple option with that label. Otherwise keys
    /// are compared against composite options under the catalog's
    /// [`MatchPolicy`]. Values never take part in matching.
    pub fn match_definition<S: AsRef<str>>(&self, keys: &[S]) -> Option<&OptionDefinition> {
        if let [key] = keys {
            let key: &str = key.as_ref();
            let simple = self
                .definitions
                .iter()
                .find(|d| matches!(d, OptionDefinition::Simple(label) if label.as_str() == key));
            if simple.is_some() {
                return simple;
            }
        }

        self.definitions.iter().find(|d| match d {
            OptionDefinition::Composite(labels) => self.composite_matches(labels, keys),
            OptionDefinition::Simple(_) => false,
        })
    }

    fn composite_matches<S: AsRef<str>>(&self, labels: &[String], keys: &[S]) -> bool {
        if labels.len() != keys.len() {
            return false;
        }
        match self.policy {
            MatchPolicy::Ordered => labels
                .iter()
                .zip(keys)
                .all(|(l, k)| l.as_str() == AsRef::<str>::as_ref(k)),
            MatchPolicy::Unordered => {
                let keys: HashSet<&str> = keys.iter().map(AsRef::<str>::as_ref).collect();
                keys.len() == labels.len() && labels.iter().all(|l| keys.contains(l.as_str()))
            }
        }
    }
}

fn validate_definition(def: &OptionDefinition) -> Result<()> {
    if let OptionDefinition::Composite(labels) = def {
        if labels.len() < 2 {
            return Err(FieldSetError::CompositeTooShort {
                labels: labels.clone(),
            });
        }
    }

    let mut labels = HashSet::new();
    for label in def.labels() {
        if label.is_empty() {
            return Err(FieldSetError::EmptyLabel);
        }
        if !labels.insert(label.as_str()) {
            return Err(FieldSetError::DuplicateLabel {
                label: label.clone(),
            });
        }
    }
    Ok(())
}
