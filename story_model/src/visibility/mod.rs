//! Visibility model - how much of a piece of information reaches the drafting model.
//!
//! Levels form a total order `HIDDEN < AWARE < KNOW < USE`. When two policies
//! apply to the same content the more restrictive one wins, which is the
//! lattice meet (numerical minimum).

mod config;
mod secret;

pub use config::*;
pub use secret::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Access level of the drafting model for a piece of information.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "LevelRepr", into = "u8")]
pub enum VisibilityLevel {
    /// The model is not told the information exists.
    #[default]
    Hidden = 0,
    /// The model is told "something exists here" through an opaque hint.
    Aware = 1,
    /// The model has the content but must not surface it verbatim.
    Know = 2,
    /// Unrestricted.
    Use = 3,
}

impl VisibilityLevel {
    /// All levels, most restrictive first.
    pub const ALL: [VisibilityLevel; 4] = [
        VisibilityLevel::Hidden,
        VisibilityLevel::Aware,
        VisibilityLevel::Know,
        VisibilityLevel::Use,
    ];

    /// Coerce an integer into a level, rejecting anything outside `0..=3`.
    pub fn from_int(value: i64) -> ModelResult<Self> {
        match value {
            0 => Ok(VisibilityLevel::Hidden),
            1 => Ok(VisibilityLevel::Aware),
            2 => Ok(VisibilityLevel::Know),
            3 => Ok(VisibilityLevel::Use),
            other => Err(ModelError::Validation(format!(
                "visibility level must be between 0 and 3, got {}",
                other
            ))),
        }
    }

    /// Numeric value of the level.
    pub fn as_int(self) -> u8 {
        self as u8
    }

    /// The more restrictive of two levels.
    pub fn meet(self, other: VisibilityLevel) -> VisibilityLevel {
        self.min(other)
    }

    /// The less restrictive of two levels.
    pub fn join(self, other: VisibilityLevel) -> VisibilityLevel {
        self.max(other)
    }

    /// Lower-case name used in documents and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityLevel::Hidden => "hidden",
            VisibilityLevel::Aware => "aware",
            VisibilityLevel::Know => "know",
            VisibilityLevel::Use => "use",
        }
    }

    /// Whether the content itself is given to the model.
    pub fn reveals_content(&self) -> bool {
        *self >= VisibilityLevel::Know
    }

    /// Whether the model is told the information exists at all.
    pub fn reveals_existence(&self) -> bool {
        *self >= VisibilityLevel::Aware
    }
}

/// Meet of two levels (`min`).
pub fn meet(a: VisibilityLevel, b: VisibilityLevel) -> VisibilityLevel {
    a.meet(b)
}

/// Meet of any number of levels; `USE` for an empty input.
pub fn meet_all(levels: impl IntoIterator<Item = VisibilityLevel>) -> VisibilityLevel {
    levels
        .into_iter()
        .fold(VisibilityLevel::Use, VisibilityLevel::meet)
}

impl std::fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl TryFrom<i64> for VisibilityLevel {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_int(value)
    }
}

impl From<VisibilityLevel> for u8 {
    fn from(level: VisibilityLevel) -> Self {
        level.as_int()
    }
}

impl FromStr for VisibilityLevel {
    type Err = ModelError;

    /// Accepts either the integer form (`"2"`) or the name (`"know"`, any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::from_int(n);
        }
        match trimmed.to_lowercase().as_str() {
            "hidden" => Ok(VisibilityLevel::Hidden),
            "aware" => Ok(VisibilityLevel::Aware),
            "know" => Ok(VisibilityLevel::Know),
            "use" => Ok(VisibilityLevel::Use),
            _ => Err(ModelError::Validation(format!(
                "unknown visibility level '{}'",
                trimmed
            ))),
        }
    }
}

/// Wire representation accepted on input.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Int(i64),
    Name(String),
}

impl TryFrom<LevelRepr> for VisibilityLevel {
    type Error = ModelError;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Int(n) => Self::from_int(n),
            LevelRepr::Name(name) => name.parse(),
        }
    }
}

/// A pre-approved paraphrase the model may use for content it only "knows".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedExpression {
    pub expression: String,

    /// When the paraphrase is appropriate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AllowedExpression {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
