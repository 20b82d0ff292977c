//! Error types for treemorph.
//!
//! The per-frame engine has no failure modes of its own. Everything that can
//! go wrong happens at the boundary: loading and validating a [`SceneConfig`].
//!
//! [`SceneConfig`]: crate::config::SceneConfig

use std::fmt;

/// Errors that can occur while loading or validating scene configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A particle count that must be positive was zero.
    ZeroCount(&'static str),
    /// A numeric parameter was NaN or infinite.
    NotFinite(&'static str),
    /// A numeric parameter was outside its allowed range.
    OutOfRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
        /// Human readable description of the allowed range.
        expected: &'static str,
    },
    /// A colour string was not of the form `#rrggbb`.
    Color(String),
    /// Failed to parse a JSON config document.
    Parse(serde_json::Error),
    /// Failed to read a config file from disk.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCount(field) => write!(f, "{} must be greater than zero", field),
            ConfigError::NotFinite(field) => write!(f, "{} must be a finite number", field),
            ConfigError::OutOfRange { field, value, expected } => {
                write!(f, "{} = {} is out of range (expected {})", field, value, expected)
            }
            ConfigError::Color(raw) => write!(f, "Invalid colour '{}': expected #rrggbb", raw),
            ConfigError::Parse(e) => write!(f, "Failed to parse scene config: {}", e),
            ConfigError::Io(e) => write!(f, "Failed to read scene config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
