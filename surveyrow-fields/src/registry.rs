//! Remembered option choices shared by every row of a category
//!
//! The registry is constructed once by the host and handed to each
//! controller it configures. Cloning the registry clones the handle, not the
//! entries, so all clones observe the same choices.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

/// Category id → last chosen symbolic type name.
///
/// # Examples
///
/// ```
/// use surveyrow_fields::DefaultSelectionRegistry;
///
/// let registry = DefaultSelectionRegistry::new();
/// let shared = registry.clone();
///
/// registry.record_choice("body", "height");
/// assert_eq!(shared.lookup_choice("body").as_deref(), Some("height"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultSelectionRegistry {
    choices: Arc<DashMap<String, String>>,
}

impl DefaultSelectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `type_name` as the choice for `category_id`, replacing any prior choice
    pub fn record_choice(&self, category_id: impl Into<String>, type_name: impl Into<String>) {
        let category_id = category_id.into();
        let type_name = type_name.into();
        debug!(category = %category_id, choice = %type_name, "recorded default option");
        self.choices.insert(category_id, type_name);
    }

    /// Last recorded choice for `category_id`
    pub fn lookup_choice(&self, category_id: &str) -> Option<String> {
        self.choices.get(category_id).map(|entry| entry.value().clone())
    }

    /// Number of categories with a recorded choice
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
