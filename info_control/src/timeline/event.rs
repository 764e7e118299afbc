//! Flattened timeline events.

use serde::{Deserialize, Serialize};

use story_model::{Foreshadowing, Subtlety, TimelineEntry, TimelineEventType};

/// One timeline entry joined with its foreshadowing's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub foreshadowing_id: String,
    pub foreshadowing_title: String,
    pub episode: String,
    pub event_type: TimelineEventType,
    pub expression: String,
    pub subtlety: Option<Subtlety>,
    pub event_date: Option<String>,
}

impl TimelineEvent {
    pub fn from_entry(foreshadowing: &Foreshadowing, entry: &TimelineEntry) -> Self {
        Self {
            foreshadowing_id: foreshadowing.id.clone(),
            foreshadowing_title: foreshadowing.title.clone(),
            episode: entry.episode.clone(),
            event_type: entry.event_type,
            expression: entry.expression.clone(),
            subtlety: entry.subtlety,
            event_date: entry.date.clone(),
        }
    }
}
