use super::ErrorSink;
use crate::report::MaskedErrorReport;
use colored::Colorize;
use std::io::Write;

/// Writes reports to the process standard error stream
#[derive(Debug, Default)]
pub struct ConsoleSink {
    use_json: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_json: false }
    }

    pub fn json_format(mut self) -> Self {
        self.use_json = true;
        self
    }

    pub(crate) fn format_report(&self, report: &MaskedErrorReport) -> String {
        if self.use_json {
            return serde_json::to_string(report).unwrap_or_else(|_| report.message.clone());
        }

        let timestamp = report.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let mut output = format!(
            "{} {} {} [{}] {}",
            timestamp,
            "ERROR".red(),
            report.coordinate().bold(),
            report.correlation_id,
            report.message
        );

        if let Some(path) = &report.path {
            output.push_str(&format!("\n  Path: {}", path));
        }

        for cause in &report.causes {
            output.push_str(&format!("\n  Caused by: {}", cause));
        }

        if let Some(stack_trace) = &report.stack_trace {
            output.push_str("\n  Stack trace:\n");
            output.push_str(&stack_trace.dimmed().to_string());
        }

        output
    }
}

impl ErrorSink for ConsoleSink {
    fn report(&self, report: &MaskedErrorReport) {
        let formatted = self.format_report(report);
        eprintln!("{}", formatted);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
