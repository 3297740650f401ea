//! FieldSetController: the state machine behind a dynamic-label row.
//!
//! A controller is configured with a shared [`OptionCatalog`] and a
//! [`DefaultSelectionRegistry`], receives the row's stored value, and keeps
//! the live field list in step with the active option:
//!
//! ```text
//! Uninitialized ──set_incoming_value──▶ Populated(option)
//!       ▲                                  │  switch_option
//!       │ configure                        ▼
//!    Cleared ◀──prepare_for_reuse── Populated(option')
//! ```
//!
//! Every anomaly is logged through the row's [`RowLogger`] and leaves the
//! visible state unchanged; nothing here panics.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::{ActiveField, DataDelegate, PresentationAdapter};
use crate::catalog::OptionCatalog;
use crate::error::{FieldSetError, Result};
use crate::logging::{report, RowLogger, TracingLogger};
use crate::registry::DefaultSelectionRegistry;
use crate::types::{FieldEntry, FieldSetState, OptionDefinition, ValueMapping};

/// Lifecycle state of one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowState {
    /// Configured (or fresh), no field list yet.
    #[default]
    Uninitialized,
    /// Showing the fields of an active option.
    Populated(FieldSetState),
    /// Reused; fields and bindings dropped until the next `configure`.
    Cleared,
}

/// Outcome of [`FieldSetController::set_incoming_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The value's keys matched an option; fields carry its values.
    Matched,
    /// No value was supplied; the default option is shown blank.
    Defaulted,
    /// The value's keys matched no option; nothing changed.
    Unmatched,
    /// No usable catalog is configured; nothing changed.
    NotConfigured,
}

/// Stateful core of a dynamic-label row.
pub struct FieldSetController {
    catalog: Option<Arc<OptionCatalog>>,
    registry: Option<DefaultSelectionRegistry>,
    state: RowState,
    update_id: Option<String>,
    adapter: Option<Box<dyn PresentationAdapter>>,
    delegate: Option<Arc<dyn DataDelegate>>,
    logger: Arc<dyn RowLogger>,
}

impl FieldSetController {
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    pub fn with_logger(logger: Arc<dyn RowLogger>) -> Self {
        Self {
            catalog: None,
            registry: None,
            state: RowState::Uninitialized,
            update_id: None,
            adapter: None,
            delegate: None,
            logger,
        }
    }

    /// Bind the row to its options and the registry shared by its category.
    ///
    /// An empty catalog is reported and the row stays empty.
    pub fn configure(&mut self, catalog: Arc<OptionCatalog>, registry: DefaultSelectionRegistry) {
        let empty = catalog.is_empty();
        self.catalog = Some(catalog);
        self.registry = Some(registry);
        self.state = RowState::Uninitialized;

        if empty {
            report(self.logger.as_ref(), &FieldSetError::EmptyCatalog);
        }
    }

    /// Attach the host collaborators and the id used to tag updates.
    pub fn bind(
        &mut self,
        update_id: impl Into<String>,
        adapter: Box<dyn PresentationAdapter>,
        delegate: Arc<dyn DataDelegate>,
    ) {
        self.update_id = Some(update_id.into());
        self.adapter = Some(adapter);
        self.delegate = Some(delegate);
    }

    /// Resolve the active option from the row's stored value.
    ///
    /// With no value (or an empty one) the remembered choice for the
    /// category is shown, falling back to the first option. A value whose
    /// keys match no option leaves the row as it is.
    pub fn set_incoming_value(&mut self, value: Option<&ValueMapping>) -> Resolution {
        let Some(catalog) = self.usable_catalog() else {
            return Resolution::NotConfigured;
        };

        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                let Some(option) = self.default_option(&catalog) else {
                    return Resolution::NotConfigured;
                };
                debug!(option = %option.title(), "showing default option");
                self.apply(FieldSetState::blank(option));
                return Resolution::Defaulted;
            }
        };

        let keys: Vec<&str> = value.keys().map(String::as_str).collect();
        match catalog.match_definition(keys.as_slice()) {
            Some(option) => {
                self.apply(FieldSetState::with_values(option.clone(), value));
                Resolution::Matched
            }
            None => {
                debug!(?keys, "incoming value matches no option");
                Resolution::Unmatched
            }
        }
    }

    /// Present every option through the adapter and switch to the chosen one.
    ///
    /// Returns the newly active option, or `None` when the picker was
    /// dismissed or the row cannot present it.
    pub fn choose_option(&mut self) -> Option<OptionDefinition> {
        let catalog = self.usable_catalog()?;
        let titles = catalog.titles();
        let index = self.adapter.as_mut()?.present_option_picker(&titles)?;

        let Some(option) = catalog.get(index).cloned() else {
            debug!(index, "picker returned an index outside the catalog");
            return None;
        };
        self.switch_option(&option).ok()?;
        Some(option)
    }

    /// Replace the field list with a blank one for `option`.
    ///
    /// Values never carry across options. When the catalog has category
    /// metadata the option's type name becomes the category default.
    pub fn switch_option(&mut self, option: &OptionDefinition) -> Result<()> {
        let Some(catalog) = self.usable_catalog() else {
            return Err(FieldSetError::NotConfigured);
        };
        let Some(position) = catalog.position(option) else {
            let err = FieldSetError::UnknownOption {
                title: option.title(),
            };
            report(self.logger.as_ref(), &err);
            return Err(err);
        };

        self.apply(FieldSetState::blank(option.clone()));

        if let (Some(meta), Some(type_name), Some(registry)) = (
            catalog.metadata(),
            catalog.type_name(position),
            self.registry.as_ref(),
        ) {
            registry.record_choice(meta.id.as_str(), type_name);
        }

        if let Some(adapter) = self.adapter.as_mut() {
            adapter.request_relayout();
        }
        if let Some(delegate) = &self.delegate {
            delegate.on_ui_refresh_requested();
        }
        Ok(())
    }

    /// Update one field in place. Nothing is emitted until the edit ends.
    pub fn edit_field(&mut self, label: &str, value: impl Into<String>) -> Result<()> {
        let updated = match &mut self.state {
            RowState::Populated(state) => state.set_value(label, value),
            _ => false,
        };
        if updated {
            Ok(())
        } else {
            Err(self.unknown_field(label))
        }
    }

    /// Tell the delegate that `label` gained focus.
    pub fn begin_editing(&self, label: &str) -> Result<()> {
        if !self.active_option().is_some_and(|o| o.contains_label(label)) {
            return Err(self.unknown_field(label));
        }
        if let (Some(delegate), Some(update_id)) = (&self.delegate, &self.update_id) {
            delegate.on_active_field_changed(&ActiveField {
                update_id: update_id.clone(),
                label: Some(label.to_string()),
            });
        }
        Ok(())
    }

    /// End the edit session for `label` and emit the row's values.
    pub fn end_editing(&mut self, label: &str) -> Result<()> {
        if !self.active_option().is_some_and(|o| o.contains_label(label)) {
            return Err(self.unknown_field(label));
        }
        self.commit()
    }

    /// Emit the row's current values (the "done" action).
    pub fn commit(&self) -> Result<()> {
        let Some(update_id) = self.update_id.as_deref() else {
            let err = FieldSetError::MissingUpdateId;
            report(self.logger.as_ref(), &err);
            return Err(err);
        };
        if let Some(delegate) = &self.delegate {
            delegate.on_update(update_id, &self.capture_values());
        }
        Ok(())
    }

    /// Emit the row's values, then signal that the user moved past the row.
    pub fn advance(&self) -> Result<()> {
        self.commit()?;
        if let (Some(delegate), Some(update_id)) = (&self.delegate, self.update_id.as_deref()) {
            delegate.on_finished(update_id);
        }
        Ok(())
    }

    /// Current values keyed by label; empty when no option is active.
    pub fn capture_values(&self) -> ValueMapping {
        match &self.state {
            RowState::Populated(state) => state.values(),
            _ => ValueMapping::new(),
        }
    }

    /// Drop fields, catalog and host bindings before the row is reused.
    pub fn prepare_for_reuse(&mut self) {
        self.state = RowState::Cleared;
        self.catalog = None;
        self.registry = None;
        self.update_id = None;
        self.adapter = None;
        self.delegate = None;
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    pub fn active_option(&self) -> Option<&OptionDefinition> {
        match &self.state {
            RowState::Populated(state) => Some(state.active_option()),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[FieldEntry] {
        match &self.state {
            RowState::Populated(state) => state.fields(),
            _ => &[],
        }
    }

    pub fn update_id(&self) -> Option<&str> {
        self.update_id.as_deref()
    }

    pub fn catalog(&self) -> Option<&OptionCatalog> {
        self.catalog.as_deref()
    }

    // --- Internal ---

    fn usable_catalog(&self) -> Option<Arc<OptionCatalog>> {
        let err = match &self.catalog {
            Some(catalog) if !catalog.is_empty() => return Some(Arc::clone(catalog)),
            Some(_) => FieldSetError::EmptyCatalog,
            None => FieldSetError::NotConfigured,
        };
        report(self.logger.as_ref(), &err);
        None
    }

    fn default_option(&self, catalog: &OptionCatalog) -> Option<OptionDefinition> {
        let remembered = catalog.metadata().and_then(|meta| {
            let choice = self.registry.as_ref()?.lookup_choice(&meta.id)?;
            meta.position_of(&choice)
        });
        catalog
            .get(remembered.unwrap_or(0))
            .or_else(|| catalog.get(0))
            .cloned()
    }

    fn apply(&mut self, state: FieldSetState) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.render_fields(state.fields());
        }
        self.state = RowState::Populated(state);
    }

    fn unknown_field(&self, label: &str) -> FieldSetError {
        let err = FieldSetError::UnknownField {
            label: label.to_string(),
        };
        report(self.logger.as_ref(), &err);
        err
    }
}

impl Default for FieldSetController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldSetController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSetController")
            .field("catalog", &self.catalog)
            .field("state", &self.state)
            .field("update_id", &self.update_id)
            .field("bound", &self.adapter.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use crate::test_utils::{DelegateEvent, RecordingAdapter, RecordingDelegate, RecordingLogger};
    use crate::types::CategoryMetadata;

    fn values(pairs: &[(&str, &str)]) -> ValueMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn body_catalog() -> Arc<OptionCatalog> {
        Arc::new(
            OptionCatalog::new(
                vec![
                    OptionDefinition::simple("Age"),
                    OptionDefinition::composite(["Feet", "Inches"]),
                ],
                Some(CategoryMetadata::new("body", ["age", "height"])),
            )
            .unwrap(),
        )
    }

    fn controller_with_logger() -> (FieldSetController, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        (FieldSetController::with_logger(logger.clone()), logger)
    }

    #[test_log::test]
    fn matched_value_round_trips() {
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());

        let incoming = values(&[("Feet", "5"), ("Inches", "6")]);
        assert_eq!(row.set_incoming_value(Some(&incoming)), Resolution::Matched);
        assert_eq!(
            row.active_option(),
            Some(&OptionDefinition::composite(["Feet", "Inches"]))
        );
        assert_eq!(row.capture_values(), incoming);
    }

    #[test_log::test]
    fn empty_value_defaults_to_first_option() {
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());

        assert_eq!(
            row.set_incoming_value(Some(&ValueMapping::new())),
            Resolution::Defaulted
        );
        assert_eq!(row.active_option(), Some(&OptionDefinition::simple("Age")));
        assert_eq!(row.capture_values(), values(&[("Age", "")]));
    }

    #[test]
    fn default_does_not_write_registry() {
        let registry = DefaultSelectionRegistry::new();
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), registry.clone());

        row.set_incoming_value(None);
        assert!(registry.is_empty());
    }

    #[test]
    fn unmatched_value_renders_nothing() {
        let adapter = RecordingAdapter::new();
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind(
            "height",
            Box::new(adapter.clone()),
            Arc::new(RecordingDelegate::default()),
        );

        let incoming = values(&[("Weight", "150")]);
        assert_eq!(row.set_incoming_value(Some(&incoming)), Resolution::Unmatched);
        assert_eq!(row.state(), &RowState::Uninitialized);
        assert!(row.fields().is_empty());
        assert!(adapter.renders().is_empty());
    }

    #[test]
    fn unmatched_value_keeps_previous_fields() {
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        row.set_incoming_value(Some(&values(&[("Weight", "150")])));
        assert_eq!(row.capture_values(), values(&[("Age", "41")]));
    }

    #[test]
    fn value_before_configure_is_logged() {
        let (mut row, logger) = controller_with_logger();

        let resolution = row.set_incoming_value(Some(&values(&[("Age", "41")])));
        assert_eq!(resolution, Resolution::NotConfigured);
        assert_eq!(row.state(), &RowState::Uninitialized);
        assert!(logger.contains("configured before a value"));
        assert_eq!(logger.severities(), vec![ErrorSeverity::Critical]);
    }

    #[test]
    fn empty_catalog_is_logged_on_configure_and_value() {
        let (mut row, logger) = controller_with_logger();
        let empty = Arc::new(OptionCatalog::new(Vec::new(), None).unwrap());

        row.configure(empty, DefaultSelectionRegistry::new());
        assert_eq!(row.set_incoming_value(None), Resolution::NotConfigured);
        assert!(row.fields().is_empty());
        assert_eq!(logger.messages().len(), 2);
        assert!(logger.contains("label options are empty"));
    }

    #[test]
    fn switch_option_clears_values_and_records_choice() {
        let registry = DefaultSelectionRegistry::new();
        let adapter = RecordingAdapter::new();
        let delegate = Arc::new(RecordingDelegate::default());
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), registry.clone());
        row.bind("height", Box::new(adapter.clone()), delegate.clone());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        row.switch_option(&OptionDefinition::composite(["Feet", "Inches"]))
            .unwrap();

        assert_eq!(row.capture_values(), values(&[("Feet", ""), ("Inches", "")]));
        assert_eq!(registry.lookup_choice("body").as_deref(), Some("height"));
        assert_eq!(adapter.relayouts(), 1);
        assert_eq!(adapter.renders().len(), 2);
        assert_eq!(delegate.events(), vec![DelegateEvent::RefreshRequested]);
    }

    #[test]
    fn switch_to_same_option_still_clears() {
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        row.switch_option(&OptionDefinition::simple("Age")).unwrap();
        assert_eq!(row.capture_values(), values(&[("Age", "")]));
    }

    #[test]
    fn switch_to_unknown_option_is_rejected() {
        let (mut row, logger) = controller_with_logger();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        let err = row
            .switch_option(&OptionDefinition::simple("Weight"))
            .unwrap_err();
        assert!(matches!(err, FieldSetError::UnknownOption { .. }));
        assert_eq!(row.capture_values(), values(&[("Age", "41")]));
        assert!(logger.contains("Weight"));
    }

    #[test]
    fn switch_without_metadata_leaves_registry_untouched() {
        let registry = DefaultSelectionRegistry::new();
        let catalog = Arc::new(
            OptionCatalog::new(
                vec![
                    OptionDefinition::simple("Pounds"),
                    OptionDefinition::simple("Kilograms"),
                ],
                None,
            )
            .unwrap(),
        );
        let mut row = FieldSetController::new();
        row.configure(catalog, registry.clone());

        row.switch_option(&OptionDefinition::simple("Kilograms"))
            .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn choose_option_uses_picker_selection() {
        let adapter = RecordingAdapter::new().with_selection(Some(1));
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind(
            "height",
            Box::new(adapter.clone()),
            Arc::new(RecordingDelegate::default()),
        );
        row.set_incoming_value(None);

        let chosen = row.choose_option();
        assert_eq!(chosen, Some(OptionDefinition::composite(["Feet", "Inches"])));
        assert_eq!(
            adapter.picker_titles(),
            vec![vec!["Age".to_string(), "Feet, Inches".to_string()]]
        );
    }

    #[test]
    fn dismissed_picker_changes_nothing() {
        let adapter = RecordingAdapter::new().with_selection(None);
        let registry = DefaultSelectionRegistry::new();
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), registry.clone());
        row.bind(
            "height",
            Box::new(adapter.clone()),
            Arc::new(RecordingDelegate::default()),
        );
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        assert_eq!(row.choose_option(), None);
        assert_eq!(row.capture_values(), values(&[("Age", "41")]));
        assert!(registry.is_empty());
    }

    #[test]
    fn edits_emit_only_when_session_ends() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind("height", Box::new(RecordingAdapter::new()), delegate.clone());
        row.set_incoming_value(Some(&values(&[("Feet", "5"), ("Inches", "6")])));

        row.edit_field("Inches", "1").unwrap();
        row.edit_field("Inches", "11").unwrap();
        assert!(delegate.events().is_empty());

        row.end_editing("Inches").unwrap();
        assert_eq!(
            delegate.events(),
            vec![DelegateEvent::Update {
                update_id: "height".into(),
                data: values(&[("Feet", "5"), ("Inches", "11")]),
            }]
        );
    }

    #[test]
    fn edit_unknown_field_is_rejected() {
        let (mut row, logger) = controller_with_logger();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.set_incoming_value(None);

        let err = row.edit_field("Weight", "150").unwrap_err();
        assert!(matches!(err, FieldSetError::UnknownField { .. }));
        assert_eq!(logger.severities(), vec![ErrorSeverity::Warning]);
        assert!(row.end_editing("Weight").is_err());
    }

    #[test]
    fn begin_editing_reports_active_field() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind("height", Box::new(RecordingAdapter::new()), delegate.clone());
        row.set_incoming_value(Some(&values(&[("Feet", "5"), ("Inches", "6")])));

        row.begin_editing("Feet").unwrap();
        assert_eq!(
            delegate.events(),
            vec![DelegateEvent::ActiveField(ActiveField {
                update_id: "height".into(),
                label: Some("Feet".into()),
            })]
        );
    }

    #[test]
    fn advance_emits_update_then_finished() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind("height", Box::new(RecordingAdapter::new()), delegate.clone());
        row.set_incoming_value(None);

        row.advance().unwrap();
        assert_eq!(
            delegate.events(),
            vec![
                DelegateEvent::Update {
                    update_id: "height".into(),
                    data: values(&[("Age", "")]),
                },
                DelegateEvent::Finished("height".into()),
            ]
        );
    }

    #[test]
    fn commit_without_update_id_is_logged() {
        let (mut row, logger) = controller_with_logger();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.set_incoming_value(None);

        assert!(matches!(row.commit(), Err(FieldSetError::MissingUpdateId)));
        assert!(logger.contains("no update id"));
    }

    #[test]
    fn reuse_clears_fields_and_bindings() {
        let delegate = Arc::new(RecordingDelegate::default());
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind("height", Box::new(RecordingAdapter::new()), delegate.clone());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        row.prepare_for_reuse();
        assert_eq!(row.state(), &RowState::Cleared);
        assert!(row.fields().is_empty());
        assert_eq!(row.update_id(), None);

        assert!(row.begin_editing("Age").is_err());
        assert!(delegate.events().is_empty());

        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        assert_eq!(row.state(), &RowState::Uninitialized);
    }

    #[test]
    fn stale_registry_choice_falls_back_to_first_option() {
        let registry = DefaultSelectionRegistry::new();
        registry.record_choice("body", "retired-type");
        let mut row = FieldSetController::new();
        row.configure(body_catalog(), registry);

        row.set_incoming_value(None);
        assert_eq!(row.active_option(), Some(&OptionDefinition::simple("Age")));
    }

    #[test]
    fn begin_editing_unknown_label_is_rejected() {
        let delegate = Arc::new(RecordingDelegate::default());
        let logger = Arc::new(RecordingLogger::default());
        let mut row = FieldSetController::with_logger(logger.clone());
        row.configure(body_catalog(), DefaultSelectionRegistry::new());
        row.bind("height", Box::new(RecordingAdapter::new()), delegate.clone());
        row.set_incoming_value(Some(&values(&[("Age", "41")])));

        let err = row.begin_editing("Weight").unwrap_err();
        assert!(matches!(err, FieldSetError::UnknownField { .. }));
        assert!(delegate.events().is_empty());
        assert_eq!(logger.severities(), vec![ErrorSeverity::Warning]);
    }

    #[test]
    fn captured_keys_follow_option_order() {
        let catalog = OptionCatalog::new(
            vec![
                OptionDefinition::simple("Age"),
                OptionDefinition::composite(["Feet", "Inches"]),
            ],
            None,
        )
        .unwrap()
        .with_match_policy(crate::catalog::MatchPolicy::Unordered);
        let mut row = FieldSetController::new();
        row.configure(Arc::new(catalog), DefaultSelectionRegistry::new());

        let reversed = values(&[("Inches", "6"), ("Feet", "5")]);
        assert_eq!(row.set_incoming_value(Some(&reversed)), Resolution::Matched);

        let captured = row.capture_values();
        let keys: Vec<&str> = captured.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Feet", "Inches"]);
        assert_eq!(captured.get("Inches").map(String::as_str), Some("6"));
    }
}
