//! Single text-field rows
//!
//! The plain sibling of the dynamic-label row: one input, one string value.
//! Updates are sent only when the text actually changes, and never while
//! the row is still being set up (before it is bound to an update id).

use std::sync::Arc;

use tracing::debug;

use crate::adapter::{ActiveField, TextDelegate};
use crate::error::{FieldSetError, Result};
use crate::logging::{report, RowLogger, TracingLogger};

pub struct TextRowController {
    text: Option<String>,
    update_id: Option<String>,
    delegate: Option<Arc<dyn TextDelegate>>,
    logger: Arc<dyn RowLogger>,
}

impl TextRowController {
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    pub fn with_logger(logger: Arc<dyn RowLogger>) -> Self {
        Self {
            text: None,
            update_id: None,
            delegate: None,
            logger,
        }
    }

    pub fn bind(&mut self, update_id: impl Into<String>, delegate: Arc<dyn TextDelegate>) {
        self.update_id = Some(update_id.into());
        self.delegate = Some(delegate);
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn update_id(&self) -> Option<&str> {
        self.update_id.as_deref()
    }

    /// Store `text`, emitting an update when a bound row's text changed.
    ///
    /// Clearing an already empty row is not a change. Returns whether an
    /// update was sent.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let previous = self.text.replace(text.clone()).unwrap_or_default();

        let Some(update_id) = self.update_id.as_deref() else {
            // still being set up
            return false;
        };
        if previous.is_empty() && text.is_empty() {
            return false;
        }
        if previous == text {
            return false;
        }

        debug!(update_id, "text row changed");
        if let Some(delegate) = &self.delegate {
            delegate.on_update(update_id, &text);
        }
        true
    }

    /// Focus left the input.
    pub fn end_editing(&mut self, text: impl Into<String>) -> bool {
        self.set_text(text)
    }

    /// Return key pressed.
    pub fn submit(&mut self, text: impl Into<String>) -> bool {
        self.set_text(text)
    }

    /// User moved past the row: signal "finished", then store the text.
    pub fn advance(&mut self, text: impl Into<String>) -> Result<bool> {
        let Some(update_id) = self.update_id.as_deref() else {
            let err = FieldSetError::MissingUpdateId;
            report(self.logger.as_ref(), &err);
            return Err(err);
        };
        if let Some(delegate) = &self.delegate {
            delegate.on_finished(update_id);
        }
        Ok(self.set_text(text))
    }

    pub fn begin_editing(&self) {
        let (Some(delegate), Some(update_id)) = (&self.delegate, &self.update_id) else {
            return;
        };
        delegate.on_active_field_changed(&ActiveField {
            update_id: update_id.clone(),
            label: None,
        });
    }

    pub fn prepare_for_reuse(&mut self) {
        self.text = None;
        self.update_id = None;
        self.delegate = None;
    }
}

impl Default for TextRowController {
    fn default() -> Self {
        Self::new()
    }
}
