//! Error types for the experiment environment layer.

use thiserror::Error;

/// Errors that can occur while reading platform-provided configuration.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Config file could not be read
    #[error("Failed to read session config: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Config file is not valid JSON for a session config
    #[error("Failed to parse session config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An identifier was outside its valid range
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl EnvError {
    /// Creates an invalid identifier error.
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
