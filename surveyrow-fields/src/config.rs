//! Row configuration as written in survey documents
//!
//! ```yaml
//! id: height
//! label_options:
//!   - Age
//!   - [Feet, Inches]
//! options_metadata:
//!   id: body
//!   types: [age, height]
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{MatchPolicy, OptionCatalog};
use crate::error::Result;
use crate::types::{CategoryMetadata, OptionDefinition};

/// One dynamic-label row as described by a survey document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowConfig {
    /// Update id the row's values are reported under.
    pub id: String,
    #[serde(default)]
    pub label_options: Vec<OptionDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_metadata: Option<CategoryMetadata>,
    /// Accept composite values whose keys arrive in any order.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unordered_keys: bool,
}

impl RowConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Validate the options and build a shareable catalog.
    pub fn catalog(&self) -> Result<Arc<OptionCatalog>> {
        let policy = if self.unordered_keys {
            MatchPolicy::Unordered
        } else {
            MatchPolicy::Ordered
        };
        let catalog = OptionCatalog::new(self.label_options.clone(), self.options_metadata.clone())?
            .with_match_policy(policy);
        Ok(Arc::new(catalog))
    }
}
