//! Refresh control error types
//!
//! The control itself never fails: contradictory calls are ignored. Errors
//! only come from loading and validating configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum RefreshError {
    /// Failed to read a configuration file
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written back as TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Geometry values the drop cannot be drawn with
    #[error("Invalid metrics: {0}")]
    InvalidMetrics(String),

    /// Animation timings that are negative or not finite
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),
}

/// Result type for refresh control configuration
pub type Result<T> = std::result::Result<T, RefreshError>;
