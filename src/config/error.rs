//! Configuration error definitions

use std::error::Error;
use std::fmt;

/// Configuration error types
///
/// Raised before a run starts; a run never begins with a rejected configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A ratio or fraction outside its allowed range
    InvalidRatio { name: &'static str, value: f64 },
    /// Any other invalid argument
    InvalidArgument(String),
    /// Unknown aging curve name
    UnknownAgingCurve(String),
    /// Unknown policy name
    UnknownPolicy(String),
    /// I/O error while reading a configuration file
    IoError(std::io::Error),
    /// Malformed configuration file
    ParseError(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRatio { name, value } => {
                write!(f, "Invalid {}: {}", name, value)
            }
            ConfigError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ConfigError::UnknownAgingCurve(name) => {
                write!(
                    f,
                    "Unknown aging curve: {} (expected linear|square-root|cube-root|quadratic|cubic)",
                    name
                )
            }
            ConfigError::UnknownPolicy(name) => {
                write!(f, "Unknown policy: {} (expected wec|lru|lfu)", name)
            }
            ConfigError::IoError(err) => write!(f, "I/O error: {}", err),
            ConfigError::ParseError(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::IoError(err) => Some(err),
            ConfigError::ParseError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
