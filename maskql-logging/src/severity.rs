//! Error severity levels for masked error reports

use serde::{Deserialize, Serialize};

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Resolver returned an unexpected error
    #[default]
    High,
    /// Resolver panicked
    Critical,
}

impl ErrorSeverity {
    pub fn should_alert(&self) -> bool {
        matches!(self, ErrorSeverity::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::High => "high",
            ErrorSeverity::Critical => "critical",
        }
    }
}
