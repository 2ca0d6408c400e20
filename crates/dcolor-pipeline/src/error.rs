//! Error types for pipeline configuration.
//!
//! Pipeline construction itself never fails: degenerate numbers are
//! sanitized so every pipeline stays finite. Only loading configuration
//! can go wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file not found.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// A numeric setting is out of range.
    #[error("invalid value for {field}: {value} (must be finite and >= 1)")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}
