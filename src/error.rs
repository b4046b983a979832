//! Error types for the model generator

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Generator errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unresolvable reference: schema '{from}' references missing schema '{target}'")]
    UnresolvableReference { from: String, target: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl GeneratorError {
    /// Shorthand for a malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}
