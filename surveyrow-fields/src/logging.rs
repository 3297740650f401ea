//! Logger sink for row diagnostics
//!
//! Rows never fail loudly; they report problems through a [`RowLogger`] and
//! carry on. [`TracingLogger`] forwards to `tracing` at a level chosen from
//! the [`ErrorSeverity`].

use std::fmt::Debug;

use crate::error::{ErrorSeverity, Severity};

/// Receives diagnostic messages from rows.
pub trait RowLogger: Debug {
    fn log(&self, message: &str, severity: ErrorSeverity);
}

/// Default logger, routed into `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RowLogger for TracingLogger {
    fn log(&self, message: &str, severity: ErrorSeverity) {
        match severity {
            ErrorSeverity::Warning => tracing::warn!("{}", message),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                tracing::error!(?severity, "{}", message)
            }
        }
    }
}

/// Report `err` through a shared logger at its own severity.
pub(crate) fn report<E>(logger: &dyn RowLogger, err: &E)
where
    E: Severity + std::fmt::Display,
{
    logger.log(&err.to_string(), err.severity());
}
