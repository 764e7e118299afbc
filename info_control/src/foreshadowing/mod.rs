//! Foreshadowing management - the per-work registry of foreshadowings and
//! the scene instructions that reference them.
//!
//! The registry owns the master data. The [`TimelineIndex`] built from it is a
//! snapshot and has to be rebuilt after any mutation.

mod instruction;

pub use instruction::*;

use std::collections::HashMap;

use story_model::{
    Foreshadowing, ForeshadowingStatus, TimelineEntry, TimelineEventType, VisibilityLevel,
};

use crate::error::{ControlError, ControlResult};
use crate::timeline::TimelineIndex;

/// Registry of foreshadowings, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ForeshadowingRegistry {
    foreshadowings: Vec<Foreshadowing>,
    by_id: HashMap<String, usize>,
}

impl ForeshadowingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list, rejecting duplicate ids.
    pub fn from_foreshadowings(
        foreshadowings: impl IntoIterator<Item = Foreshadowing>,
    ) -> ControlResult<Self> {
        let mut registry = Self::new();
        for fs in foreshadowings {
            registry.register(fs)?;
        }
        Ok(registry)
    }

    /// Add a foreshadowing.
    pub fn register(&mut self, foreshadowing: Foreshadowing) -> ControlResult<()> {
        if self.by_id.contains_key(&foreshadowing.id) {
            return Err(ControlError::validation(format!(
                "foreshadowing '{}' is already registered",
                foreshadowing.id
            )));
        }
        self.by_id
            .insert(foreshadowing.id.clone(), self.foreshadowings.len());
        self.foreshadowings.push(foreshadowing);
        Ok(())
    }

    /// Parse a YAML document and register it.
    pub fn register_yaml(&mut self, yaml: &str) -> ControlResult<()> {
        let foreshadowing = Foreshadowing::from_yaml(yaml)
            .map_err(|e| ControlError::parse(format!("invalid foreshadowing document: {}", e)))?;
        self.register(foreshadowing)
    }

    pub fn get(&self, id: &str) -> Option<&Foreshadowing> {
        self.by_id.get(id).map(|&idx| &self.foreshadowings[idx])
    }

    fn get_mut(&mut self, id: &str) -> ControlResult<&mut Foreshadowing> {
        match self.by_id.get(id) {
            Some(&idx) => Ok(&mut self.foreshadowings[idx]),
            None => Err(ControlError::validation(format!(
                "unknown foreshadowing '{}'",
                id
            ))),
        }
    }

    /// All foreshadowings in registration order.
    pub fn all(&self) -> &[Foreshadowing] {
        &self.foreshadowings
    }

    pub fn len(&self) -> usize {
        self.foreshadowings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foreshadowings.is_empty()
    }

    /// Foreshadowings that are planted or reinforced.
    pub fn active(&self) -> impl Iterator<Item = &Foreshadowing> {
        self.foreshadowings.iter().filter(|fs| fs.status.is_active())
    }

    /// Foreshadowings in the given status.
    pub fn by_status(&self, status: ForeshadowingStatus) -> Vec<&Foreshadowing> {
        self.foreshadowings
            .iter()
            .filter(|fs| fs.status == status)
            .collect()
    }

    /// Effective visibility of a foreshadowing, if registered.
    pub fn effective_visibility(&self, id: &str) -> Option<VisibilityLevel> {
        self.get(id).map(Foreshadowing::effective_visibility)
    }

    /// Move a foreshadowing through the state machine.
    pub fn transition(
        &mut self,
        id: &str,
        to: ForeshadowingStatus,
        update_visibility: bool,
    ) -> ControlResult<&Foreshadowing> {
        let current = self.get_mut(id)?;
        let from = current.status;
        *current = current.transition_status(to, update_visibility)?;
        tracing::info!(
            foreshadowing_id = %id,
            from = %from,
            to = %to,
            visibility = %current.effective_visibility(),
            "Foreshadowing transitioned"
        );
        Ok(current)
    }

    /// Append an on-page event without changing status.
    pub fn record_event(&mut self, id: &str, entry: TimelineEntry) -> ControlResult<()> {
        let fs = self.get_mut(id)?;
        tracing::debug!(
            foreshadowing_id = %id,
            episode = %entry.episode,
            event_type = entry.event_type.as_str(),
            "Recorded timeline event"
        );
        fs.add_timeline_event(entry);
        Ok(())
    }

    /// Mark as planted in `episode`.
    pub fn plant(&mut self, id: &str, episode: &str, expression: &str) -> ControlResult<&Foreshadowing> {
        self.advance(id, ForeshadowingStatus::Planted, TimelineEventType::Plant, episode, expression)
    }

    /// Mark as reinforced in `episode`.
    pub fn reinforce(
        &mut self,
        id: &str,
        episode: &str,
        expression: &str,
    ) -> ControlResult<&Foreshadowing> {
        self.advance(
            id,
            ForeshadowingStatus::Reinforced,
            TimelineEventType::Reinforce,
            episode,
            expression,
        )
    }

    /// Mark as revealed in `episode`.
    pub fn reveal(&mut self, id: &str, episode: &str, expression: &str) -> ControlResult<&Foreshadowing> {
        self.advance(id, ForeshadowingStatus::Revealed, TimelineEventType::Reveal, episode, expression)
    }

    fn advance(
        &mut self,
        id: &str,
        to: ForeshadowingStatus,
        event_type: TimelineEventType,
        episode: &str,
        expression: &str,
    ) -> ControlResult<&Foreshadowing> {
        let subtlety = self.get_mut(id)?.subtlety_level;
        self.transition(id, to, true)?;
        self.record_event(
            id,
            TimelineEntry::new(episode, event_type)
                .with_expression(expression)
                .with_subtlety(subtlety),
        )?;
        self.get_mut(id).map(|fs| &*fs)
    }

    /// Snapshot the timeline of every foreshadowing.
    pub fn build_index(&self) -> TimelineIndex {
        TimelineIndex::build(&self.foreshadowings)
    }
}
