//! Option-set matching and field state for dynamic-label survey rows
//!
//! A dynamic-label row shows one of several option sets: a single labeled
//! field or an ordered group of them. `surveyrow-fields` owns the logic that
//! decides which set is active for an incoming value, keeps the live field
//! list, and remembers each category's last choice. Drawing is left to the
//! host through the traits in [`adapter`].
//!
//! # Architecture
//!
//! - **Catalog**: validated, immutable option definitions shared by `Arc`
//! - **Registry**: explicitly injected handle holding per-category defaults
//! - **Controller**: per-row state machine that never panics on bad input;
//!   problems go to a [`RowLogger`] and leave the row unchanged

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod registry;
pub mod test_utils;
pub mod text_row;
pub mod types;

pub use adapter::{ActiveField, DataDelegate, PresentationAdapter, TextDelegate};
pub use catalog::{MatchPolicy, OptionCatalog};
pub use config::RowConfig;
pub use controller::{FieldSetController, Resolution, RowState};
pub use error::{ErrorSeverity, FieldSetError, Result, Severity};
pub use logging::{RowLogger, TracingLogger};
pub use registry::DefaultSelectionRegistry;
pub use text_row::TextRowController;
pub use types::{CategoryMetadata, FieldEntry, FieldSetState, OptionDefinition, ValueMapping};
