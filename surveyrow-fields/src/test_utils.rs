//! Recording collaborators for exercising rows without a UI
//!
//! Each recorder is a cheap handle over shared state, so a test keeps one
//! clone and hands another to the row under test.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::adapter::{ActiveField, DataDelegate, PresentationAdapter, TextDelegate};
use crate::error::ErrorSeverity;
use crate::logging::RowLogger;
use crate::types::{FieldEntry, ValueMapping};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct AdapterLog {
    selection: Option<usize>,
    picker_titles: Vec<Vec<String>>,
    renders: Vec<Vec<FieldEntry>>,
    relayouts: usize,
}

/// Presentation adapter that records every call and answers the picker
/// with a preset selection.
#[derive(Debug, Clone, Default)]
pub struct RecordingAdapter {
    log: Arc<Mutex<AdapterLog>>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the picker returns; `None` simulates a dismissed picker.
    pub fn with_selection(self, selection: Option<usize>) -> Self {
        lock(&self.log).selection = selection;
        self
    }

    pub fn picker_titles(&self) -> Vec<Vec<String>> {
        lock(&self.log).picker_titles.clone()
    }

    pub fn renders(&self) -> Vec<Vec<FieldEntry>> {
        lock(&self.log).renders.clone()
    }

    pub fn last_render(&self) -> Option<Vec<FieldEntry>> {
        lock(&self.log).renders.last().cloned()
    }

    pub fn relayouts(&self) -> usize {
        lock(&self.log).relayouts
    }
}

impl PresentationAdapter for RecordingAdapter {
    fn present_option_picker(&mut self, titles: &[String]) -> Option<usize> {
        let mut log = lock(&self.log);
        log.picker_titles.push(titles.to_vec());
        log.selection
    }

    fn render_fields(&mut self, fields: &[FieldEntry]) {
        lock(&self.log).renders.push(fields.to_vec());
    }

    fn request_relayout(&mut self) {
        lock(&self.log).relayouts += 1;
    }
}

/// Anything a row sent to its delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateEvent {
    Update {
        update_id: String,
        data: ValueMapping,
    },
    TextUpdate {
        update_id: String,
        text: String,
    },
    Finished(String),
    ActiveField(ActiveField),
    RefreshRequested,
}

/// Delegate that records events in arrival order.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    events: Mutex<Vec<DelegateEvent>>,
}

impl RecordingDelegate {
    pub fn events(&self) -> Vec<DelegateEvent> {
        lock(&self.events).clone()
    }

    fn push(&self, event: DelegateEvent) {
        lock(&self.events).push(event);
    }
}

impl DataDelegate for RecordingDelegate {
    fn on_update(&self, update_id: &str, data: &ValueMapping) {
        self.push(DelegateEvent::Update {
            update_id: update_id.to_string(),
            data: data.clone(),
        });
    }

    fn on_finished(&self, update_id: &str) {
        self.push(DelegateEvent::Finished(update_id.to_string()));
    }

    fn on_active_field_changed(&self, field: &ActiveField) {
        self.push(DelegateEvent::ActiveField(field.clone()));
    }

    fn on_ui_refresh_requested(&self) {
        self.push(DelegateEvent::RefreshRequested);
    }
}

impl TextDelegate for RecordingDelegate {
    fn on_update(&self, update_id: &str, text: &str) {
        self.push(DelegateEvent::TextUpdate {
            update_id: update_id.to_string(),
            text: text.to_string(),
        });
    }

    fn on_finished(&self, update_id: &str) {
        self.push(DelegateEvent::Finished(update_id.to_string()));
    }

    fn on_active_field_changed(&self, field: &ActiveField) {
        self.push(DelegateEvent::ActiveField(field.clone()));
    }
}

/// Logger that keeps every message with its severity.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(String, ErrorSeverity)>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        lock(&self.entries).iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn severities(&self) -> Vec<ErrorSeverity> {
        lock(&self.entries).iter().map(|(_, s)| *s).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.entries).iter().any(|(m, _)| m.contains(needle))
    }
}

impl RowLogger for RecordingLogger {
    fn log(&self, message: &str, severity: ErrorSeverity) {
        lock(&self.entries).push((message.to_string(), severity));
    }
}
