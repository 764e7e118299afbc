//! Error types for the story model.

use crate::foreshadowing::ForeshadowingStatus;

/// Errors raised while constructing or mutating model values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A structural constraint was violated (out-of-range level, bad subtlety, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The foreshadowing state machine rejected the move.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: ForeshadowingStatus,
        to: ForeshadowingStatus,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
