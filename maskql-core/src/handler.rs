//! Error handlers decide what a client sees in place of a failure

use crate::errors::{InternalError, ResolveError};
use crate::schema::ResolveInfo;
use maskql_config::{MaskingConfig, MessagePolicy};
use maskql_logging::{build_sink, ConsoleSink, ErrorSeverity, ErrorSink, MaskedErrorReport};
use std::sync::Arc;
use uuid::Uuid;

/// Maps a raised error to the error that is surfaced
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: ResolveError, info: &ResolveInfo) -> ResolveError;
}

impl<F> ErrorHandler for F
where
    F: Fn(ResolveError, &ResolveInfo) -> ResolveError + Send + Sync,
{
    fn handle(&self, error: ResolveError, info: &ResolveInfo) -> ResolveError {
        self(error, info)
    }
}

/// Shared handler reference, as threaded through masking calls
pub type SharedHandler = Arc<dyn ErrorHandler>;

/// Turn a closure into a [`SharedHandler`]
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(ResolveError, &ResolveInfo) -> ResolveError + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Source of correlation identifiers
pub trait CorrelationIdSource: Send + Sync {
    fn next_id(&self) -> String;
}

impl<F> CorrelationIdSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl CorrelationIdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Reports the original error to a sink and hides it behind an [`InternalError`].
///
/// User-facing and already-internal errors are returned unchanged and not reported.
/// Reports of panics carry the panic location; reports of other errors carry a
/// backtrace only when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set.
pub struct DefaultHandler {
    policy: MessagePolicy,
    sink: Arc<dyn ErrorSink>,
    ids: Arc<dyn CorrelationIdSource>,
}

impl Default for DefaultHandler {
    fn default() -> Self {
        Self {
            policy: MessagePolicy::default(),
            sink: Arc::new(ConsoleSink::new()),
            ids: Arc::new(UuidSource),
        }
    }
}

impl DefaultHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy and sink taken from configuration
    pub fn from_config(config: &MaskingConfig) -> Self {
        Self {
            policy: config.policy,
            sink: build_sink(config),
            ids: Arc::new(UuidSource),
        }
    }

    pub fn with_policy(mut self, policy: MessagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_id_source(mut self, ids: impl CorrelationIdSource + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn policy(&self) -> MessagePolicy {
        self.policy
    }

    pub fn shared(self) -> SharedHandler {
        Arc::new(self)
    }

    fn build_report(correlation_id: &str, error: &ResolveError, info: &ResolveInfo) -> MaskedErrorReport {
        let severity = if error.is_panic() {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::High
        };

        let mut report = MaskedErrorReport::new(
            correlation_id,
            info.parent_type.as_str(),
            info.field_name.as_str(),
            error.to_string(),
        )
        .with_severity(severity);

        if !info.path.is_empty() {
            report = report.with_path(info.path_string());
        }
        for cause in error.causes() {
            report = report.with_cause(cause);
        }
        if let Some(stack_trace) = error.stack_trace() {
            report = report.with_stack_trace(stack_trace);
        }

        report
    }
}

impl ErrorHandler for DefaultHandler {
    fn handle(&self, error: ResolveError, info: &ResolveInfo) -> ResolveError {
        if error.is_user_facing() || error.is_internal() {
            return error;
        }

        let correlation_id = self.ids.next_id();
        self.sink
            .report(&Self::build_report(&correlation_id, &error, info));

        match self.policy {
            MessagePolicy::Fixed => InternalError::opaque().into(),
            MessagePolicy::Correlated => InternalError::correlated(correlation_id).into(),
        }
    }
}
