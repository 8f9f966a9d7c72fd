use super::ErrorSink;
use crate::report::MaskedErrorReport;

/// Forwards reports to the active `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorSink for TracingSink {
    fn report(&self, report: &MaskedErrorReport) {
        tracing::error!(
            target: "maskql::masked",
            correlation_id = %report.correlation_id,
            coordinate = %report.coordinate(),
            path = report.path.as_deref().unwrap_or(""),
            severity = report.severity.as_str(),
            causes = ?report.causes,
            stack_trace = report.stack_trace.as_deref().unwrap_or(""),
            "{}",
            report.message
        );
    }
}
