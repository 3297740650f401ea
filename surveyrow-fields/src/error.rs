//! Error types for option catalogs and row controllers

use thiserror::Error;

/// Result type for field set operations
pub type Result<T> = std::result::Result<T, FieldSetError>;

/// Severity levels used when a row reports a problem through its logger.
///
/// - **Warning**: the row keeps working, the event is worth noting
/// - **Error**: the requested operation was dropped, the row stays usable
/// - **Critical**: the row cannot be used until it is reconfigured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

/// Classifies an error by its impact on the row.
pub trait Severity {
    fn severity(&self) -> ErrorSeverity;
}

/// Errors that can occur while building catalogs or driving a row
#[derive(Debug, Error)]
pub enum FieldSetError {
    /// A value arrived before any catalog was configured
    #[error("label options must be configured before a value is set")]
    NotConfigured,

    /// The configured catalog has no definitions
    #[error("label options are empty")]
    EmptyCatalog,

    /// A composite option needs at least two labels
    #[error("composite option [{}] needs at least two labels", .labels.join(", "))]
    CompositeTooShort { labels: Vec<String> },

    /// Labels may not be empty strings
    #[error("option label cannot be empty")]
    EmptyLabel,

    /// A composite option lists the same label twice
    #[error("label '{label}' repeats within one option")]
    DuplicateLabel { label: String },

    /// Two options in one catalog produce the same label set
    #[error("option '{title}' duplicates the label set of another option")]
    DuplicateLabelSet { title: String },

    /// Category metadata must name one type per option
    #[error("options metadata lists {types} types for {definitions} options")]
    MetadataMismatch { types: usize, definitions: usize },

    /// The requested option is not part of the catalog
    #[error("option '{title}' is not in the catalog")]
    UnknownOption { title: String },

    /// The edited label is not part of the active option
    #[error("field '{label}' is not part of the active option")]
    UnknownField { label: String },

    /// An update was emitted before the row was bound to an update id
    #[error("row has no update id")]
    MissingUpdateId,

    /// JSON row configuration failed to parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML row configuration failed to parse
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Severity for FieldSetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // The row is inert until it is configured again
            FieldSetError::NotConfigured => ErrorSeverity::Critical,
            FieldSetError::EmptyCatalog => ErrorSeverity::Critical,

            FieldSetError::CompositeTooShort { .. } => ErrorSeverity::Error,
            FieldSetError::EmptyLabel => ErrorSeverity::Error,
            FieldSetError::DuplicateLabel { .. } => ErrorSeverity::Error,
            FieldSetError::DuplicateLabelSet { .. } => ErrorSeverity::Error,
            FieldSetError::MetadataMismatch { .. } => ErrorSeverity::Error,
            FieldSetError::UnknownOption { .. } => ErrorSeverity::Error,
            FieldSetError::Json(_) => ErrorSeverity::Error,
            FieldSetError::Yaml(_) => ErrorSeverity::Error,

            FieldSetError::UnknownField { .. } => ErrorSeverity::Warning,
            FieldSetError::MissingUpdateId => ErrorSeverity::Warning,
        }
    }
}
