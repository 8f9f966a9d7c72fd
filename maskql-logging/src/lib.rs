//! Error reporting infrastructure for maskql
//!
//! Masked resolver failures are described by a [`MaskedErrorReport`] and handed
//! to an [`ErrorSink`]. The sink is the only place the original message and stack
//! trace of a masked error end up.

pub mod init;
pub mod report;
pub mod severity;
pub mod sinks;

// Re-export main types for convenience
pub use init::{init_logging_from_config, init_simple_tracing};
pub use report::MaskedErrorReport;
pub use severity::ErrorSeverity;
pub use sinks::{build_sink, ConsoleSink, ErrorSink, MemorySink, TracingSink};
