pub mod console;
pub mod memory;
pub mod tracing_sink;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;

use crate::report::MaskedErrorReport;
use maskql_config::{MaskingConfig, SinkKind};
use std::sync::Arc;

/// Destination for the detail of masked errors
pub trait ErrorSink: Send + Sync {
    /// Record one masked error
    fn report(&self, report: &MaskedErrorReport);

    /// Flush any buffered output
    fn flush(&self) {}
}

/// Build the sink selected by the masking configuration
pub fn build_sink(config: &MaskingConfig) -> Arc<dyn ErrorSink> {
    match config.sink {
        SinkKind::Console => {
            let sink = ConsoleSink::new();
            if config.console_json {
                Arc::new(sink.json_format())
            } else {
                Arc::new(sink)
            }
        }
        SinkKind::Tracing => Arc::new(TracingSink::new()),
    }
}
