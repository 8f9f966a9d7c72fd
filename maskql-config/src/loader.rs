//! Configuration loading and environment variable handling

use crate::domains::{
    logging::{LogFormat, LogLevel, LoggingConfig},
    masking::{MaskingConfig, MessagePolicy, SinkKind},
    MaskqlConfig,
};
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "MASKQL".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<MaskqlConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: MaskqlConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<MaskqlConfig> {
        let mut config = MaskqlConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<MaskqlConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn apply_env_overrides(&self, config: &mut MaskqlConfig) -> ConfigResult<()> {
        self.apply_masking_overrides(&mut config.masking)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_masking_overrides(&self, config: &mut MaskingConfig) -> ConfigResult<()> {
        if let Ok(policy) = self.get_env_var("MASKING_POLICY") {
            config.policy = MessagePolicy::from_str(&policy)
                .map_err(|_| ConfigError::EnvError(format!("Invalid MASKING_POLICY: {}", policy)))?;
        }

        if let Ok(sink) = self.get_env_var("MASKING_SINK") {
            config.sink = SinkKind::from_str(&sink)
                .map_err(|_| ConfigError::EnvError(format!("Invalid MASKING_SINK: {}", sink)))?;
        }

        if let Ok(json) = self.get_env_var("CONSOLE_JSON") {
            config.console_json = json
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid CONSOLE_JSON: {}", e)))?;
        }

        Ok(())
    }

    fn apply_logging_overrides(&self, config: &mut LoggingConfig) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
