use super::ErrorSink;
use crate::report::MaskedErrorReport;
use std::sync::{Arc, Mutex};

/// Keeps reports in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<MaskedErrorReport>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn reports(&self) -> Vec<MaskedErrorReport> {
        self.lock().clone()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<MaskedErrorReport> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MaskedErrorReport>> {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorSink for MemorySink {
    fn report(&self, report: &MaskedErrorReport) {
        self.lock().push(report.clone());
    }
}
