//! Error masking configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Masking configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// What a masked error says to the client
    pub policy: MessagePolicy,

    /// Where the original error detail is reported
    pub sink: SinkKind,

    /// Emit console reports as JSON lines instead of coloured text
    pub console_json: bool,
}

/// Message shown in place of a masked error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    /// Always `internal error`
    Fixed,
    /// `Internal Error: <correlation id>`
    #[default]
    Correlated,
}

/// Error report destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Standard error stream
    #[default]
    Console,
    /// The active `tracing` subscriber
    Tracing,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            policy: MessagePolicy::Correlated,
            sink: SinkKind::Console,
            console_json: false,
        }
    }
}

impl FromStr for MessagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(MessagePolicy::Fixed),
            "correlated" | "correlation-id" => Ok(MessagePolicy::Correlated),
            _ => Err(format!("Invalid message policy: {}", s)),
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stderr" => Ok(SinkKind::Console),
            "tracing" => Ok(SinkKind::Tracing),
            _ => Err(format!("Invalid sink: {}", s)),
        }
    }
}

impl fmt::Display for MessagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePolicy::Fixed => write!(f, "fixed"),
            MessagePolicy::Correlated => write!(f, "correlated"),
        }
    }
}

impl Validatable for MaskingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.console_json && self.sink != SinkKind::Console {
            return Err(self.validation_error("console_json requires the console sink"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "masking"
    }
}
