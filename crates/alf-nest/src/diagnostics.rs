//! # Diagnostics
//!
//! Failing operations report the error to a [`DiagnosticSink`] before
//! returning it. The report is an observation only: the caller always gets
//! the same error back, unchanged.
//!
//! [`TracingSink`] is the default and emits one `tracing::error!` event per
//! failure with structured `operation`, `path` and `error` fields. Tests and
//! embedders that want silence or inspection use [`NullSink`] or
//! [`CollectingSink`].

use parking_lot::Mutex;

use crate::error::NestError;

/// Receives every error an operation is about to return.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per failed operation.
    fn report(&self, operation: &'static str, error: &NestError);
}

/// Emits failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, operation: &'static str, error: &NestError) {
        let path = error.path().map(|p| p.describe()).unwrap_or_default();
        tracing::error!(operation, path = %path, error = %error, "nest operation failed");
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _operation: &'static str, _error: &NestError) {}
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub operation: &'static str,
    pub error: NestError,
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<Report>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports so far, oldest first.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Remove and return all reports.
    pub fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, operation: &'static str, error: &NestError) {
        self.reports.lock().push(Report {
            operation,
            error: error.clone(),
        });
    }
}

/// Report `result`'s error, if any, and pass it through.
pub(crate) fn reported<T>(
    sink: &dyn DiagnosticSink,
    operation: &'static str,
    result: Result<T, NestError>,
) -> Result<T, NestError> {
    if let Err(e) = &result {
        sink.report(operation, e);
    }
    result
}
