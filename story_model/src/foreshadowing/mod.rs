//! Foreshadowing definitions - planted hints whose visibility evolves across episodes.

mod state;

pub use state::*;

use serde::{Deserialize, Serialize};

use crate::episode::episode_number;
use crate::error::{ModelError, ModelResult};
use crate::visibility::{AllowedExpression, VisibilityLevel};

/// How indirect a planted hint should feel, from 1 (plain) to 10 (nearly invisible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Subtlety(u8);

impl Subtlety {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Create a subtlety rating, rejecting values outside `1..=10`.
    pub fn new(value: i64) -> ModelResult<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::Validation(format!(
                "subtlety must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Subtlety {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<i64> for Subtlety {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subtlety> for u8 {
    fn from(subtlety: Subtlety) -> Self {
        subtlety.0
    }
}

impl std::fmt::Display for Subtlety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Narrative status of a foreshadowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeshadowingStatus {
    /// Designed but not yet on the page.
    #[default]
    Registered,
    /// First hint written.
    Planted,
    /// Hint repeated or strengthened.
    Reinforced,
    /// Resolved in the text.
    Revealed,
}

impl ForeshadowingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForeshadowingStatus::Registered => "registered",
            ForeshadowingStatus::Planted => "planted",
            ForeshadowingStatus::Reinforced => "reinforced",
            ForeshadowingStatus::Revealed => "revealed",
        }
    }

    /// Whether the foreshadowing is live on the page and awaiting payoff.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ForeshadowingStatus::Planted | ForeshadowingStatus::Reinforced
        )
    }
}

impl std::fmt::Display for ForeshadowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Kind of narrative device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeshadowingType {
    CharacterSecret,
    PlotTwist,
    Item,
    Relationship,
    Worldbuilding,
    #[default]
    Other,
}

/// Kind of on-page event in a foreshadowing's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineEventType {
    Plant,
    Reinforce,
    Hint,
    Reveal,
}

impl TimelineEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineEventType::Plant => "plant",
            TimelineEventType::Reinforce => "reinforce",
            TimelineEventType::Hint => "hint",
            TimelineEventType::Reveal => "reveal",
        }
    }
}

/// A single on-page mention of a foreshadowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub episode: String,

    #[serde(rename = "type")]
    pub event_type: TimelineEventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// The phrase actually used on the page.
    #[serde(default)]
    pub expression: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtlety: Option<Subtlety>,
}

impl TimelineEntry {
    pub fn new(episode: impl Into<String>, event_type: TimelineEventType) -> Self {
        Self {
            episode: episode.into(),
            event_type,
            date: None,
            expression: String::new(),
            subtlety: None,
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_subtlety(mut self, subtlety: Subtlety) -> Self {
        self.subtlety = Some(subtlety);
        self
    }
}

/// Ordered list of on-page events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForeshadowingTimeline {
    #[serde(default)]
    pub events: Vec<TimelineEntry>,
}

/// The planned resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payoff {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_episode: Option<String>,
}

/// Explicit visibility settings attached to a foreshadowing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForeshadowingVisibility {
    /// Explicit level; when set it can only lower the effective visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<VisibilityLevel>,

    #[serde(default)]
    pub forbidden_expressions: Vec<String>,

    #[serde(default)]
    pub allowed_expressions: Vec<AllowedExpression>,
}

/// A tracked narrative hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Foreshadowing {
    pub id: String,
    pub title: String,

    #[serde(rename = "type", default)]
    pub foreshadowing_type: ForeshadowingType,

    #[serde(default)]
    pub status: ForeshadowingStatus,

    #[serde(default)]
    pub subtlety_level: Subtlety,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<ForeshadowingTimeline>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payoff: Option<Payoff>,

    #[serde(default)]
    pub ai_visibility: ForeshadowingVisibility,
}

impl Foreshadowing {
    /// Create a newly registered foreshadowing.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            foreshadowing_type: ForeshadowingType::default(),
            status: ForeshadowingStatus::Registered,
            subtlety_level: Subtlety::default(),
            timeline: None,
            payoff: None,
            ai_visibility: ForeshadowingVisibility::default(),
        }
    }

    /// Parse a foreshadowing document from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn with_type(mut self, foreshadowing_type: ForeshadowingType) -> Self {
        self.foreshadowing_type = foreshadowing_type;
        self
    }

    pub fn with_status(mut self, status: ForeshadowingStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the subtlety level, rejecting values outside `1..=10`.
    pub fn with_subtlety(mut self, subtlety: i64) -> ModelResult<Self> {
        self.subtlety_level = Subtlety::new(subtlety)?;
        Ok(self)
    }

    pub fn with_payoff(mut self, content: impl Into<String>, planned_episode: Option<&str>) -> Self {
        self.payoff = Some(Payoff {
            content: content.into(),
            planned_episode: planned_episode.map(str::to_string),
        });
        self
    }

    pub fn with_visibility_level(mut self, level: VisibilityLevel) -> Self {
        self.ai_visibility.level = Some(level);
        self
    }

    pub fn with_event(mut self, entry: TimelineEntry) -> Self {
        self.add_timeline_event(entry);
        self
    }

    /// Append an on-page event.
    pub fn add_timeline_event(&mut self, entry: TimelineEntry) {
        self.timeline.get_or_insert_with(Default::default).events.push(entry);
    }

    /// Timeline events in recorded order.
    pub fn events(&self) -> &[TimelineEntry] {
        self.timeline
            .as_ref()
            .map(|t| t.events.as_slice())
            .unwrap_or(&[])
    }

    /// The event with the highest episode number (first one wins on ties).
    pub fn last_event(&self) -> Option<&TimelineEntry> {
        self.events().iter().fold(None, |best, entry| match best {
            Some(b) if episode_number(&b.episode) >= episode_number(&entry.episode) => Some(b),
            _ => Some(entry),
        })
    }

    /// The planned payoff episode, if any.
    pub fn planned_payoff_episode(&self) -> Option<&str> {
        self.payoff
            .as_ref()
            .and_then(|p| p.planned_episode.as_deref())
    }
}
