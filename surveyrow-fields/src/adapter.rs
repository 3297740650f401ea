//! Collaborator interfaces a row drives
//!
//! The presentation adapter owns drawing and modal choice; the data delegate
//! receives the row's outputs. Both are implemented by the host UI.

use crate::types::{FieldEntry, ValueMapping};

/// Identifies the input that gained focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveField {
    pub update_id: String,
    /// `None` for single-field rows.
    pub label: Option<String>,
}

/// Renders a row's labeled inputs and presents its option picker.
pub trait PresentationAdapter {
    /// Show a modal choice among `titles` and return the selected index, or
    /// `None` when the picker is dismissed.
    fn present_option_picker(&mut self, titles: &[String]) -> Option<usize>;

    /// Replace the rendered inputs with `fields`.
    fn render_fields(&mut self, fields: &[FieldEntry]);

    /// Recompute layout that depends on label widths.
    fn request_relayout(&mut self);
}

/// Sink for a row's outputs.
pub trait DataDelegate {
    fn on_update(&self, update_id: &str, data: &ValueMapping);

    fn on_finished(&self, update_id: &str);

    fn on_active_field_changed(&self, field: &ActiveField);

    fn on_ui_refresh_requested(&self);
}

/// Sink for single-field text rows, whose value is a plain string.
pub trait TextDelegate {
    fn on_update(&self, update_id: &str, text: &str);

    fn on_finished(&self, update_id: &str);

    fn on_active_field_changed(&self, field: &ActiveField);
}
