//! Error types for droidstrap
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type shared by the droidstrap crates
#[derive(Error, Debug)]
pub enum DroidstrapError {
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unresolvable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file is not valid TOML
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be written as TOML
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for droidstrap operations
pub type Result<T> = std::result::Result<T, DroidstrapError>;

impl DroidstrapError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DroidstrapError::Io(e) => format!("File operation failed: {}", e),
            DroidstrapError::Config(msg) => format!("Configuration error: {}", msg),
            DroidstrapError::TomlParse(e) => format!("Config file is not valid TOML: {}", e),
            _ => self.to_string(),
        }
    }
}
