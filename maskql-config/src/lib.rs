//! Domain-driven configuration for maskql
//!
//! Configuration is split by functional domain (masking, logging), loaded from
//! YAML with `MASKQL_*` environment overrides, and validated before use.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

pub use domains::{
    logging::{LogFormat, LogLevel, LoggingConfig},
    masking::{MaskingConfig, MessagePolicy, SinkKind},
    MaskqlConfig,
};
