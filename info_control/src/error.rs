//! Error types for the information control layer.

use story_model::ModelError;

/// Errors surfaced by information control operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// Structurally invalid input (score out of range, unknown enum value, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed markup or YAML.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error raised by the story model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Invalid configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A vault file could not be loaded.
    #[error("Failed to load '{path}': {reason}")]
    Load { path: String, reason: String },
}

impl ControlError {
    pub fn validation(message: impl Into<String>) -> Self {
        ControlError::Validation(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ControlError::Parse(message.into())
    }
}

pub type ControlResult<T> = Result<T, ControlError>;
