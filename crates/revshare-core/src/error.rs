//! Configuration Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading process configuration.
///
/// These are fatal: the process must refuse to serve requests when any of
/// them occurs at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable is present but could not be parsed
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    /// The loaded values are not usable as a split configuration
    #[error("invalid split configuration: {0}")]
    InvalidSplit(String),
}
