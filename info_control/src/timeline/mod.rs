//! Timeline Index - a derived, read-only view over foreshadowing timelines.
//!
//! The index answers pacing questions across episodes:
//! - which foreshadowings appear in an episode
//! - which active foreshadowings have been silent for too long
//! - which payoffs are coming up soon
//!
//! It is a pure function of the foreshadowings passed to [`TimelineIndex::build`].
//! Mutating a foreshadowing afterwards does not update the index; build a new one.

mod event;

pub use event::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_model::{episode_distance, episode_number, Foreshadowing, ForeshadowingStatus};

/// Default number of episodes without a mention before a foreshadowing counts as silent.
pub const DEFAULT_SILENCE_THRESHOLD: i64 = 5;

/// Default look-ahead window for upcoming payoffs.
pub const DEFAULT_PAYOFF_THRESHOLD: i64 = 3;

/// Statuses considered by the silence query unless the caller says otherwise.
pub const DEFAULT_ACTIVE_STATUSES: [ForeshadowingStatus; 2] =
    [ForeshadowingStatus::Planted, ForeshadowingStatus::Reinforced];

/// Cross-episode index of foreshadowing events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineIndex {
    /// Events grouped by episode number, in traversal order.
    events_by_episode: BTreeMap<u32, Vec<TimelineEvent>>,

    /// `(id, episode of latest mention)` in build order.
    last_mention: Vec<(String, String)>,

    /// Status of each indexed foreshadowing at build time.
    statuses: BTreeMap<String, ForeshadowingStatus>,

    total_events: usize,
}

impl TimelineIndex {
    /// Build the index from a snapshot of foreshadowings.
    pub fn build(foreshadowings: &[Foreshadowing]) -> Self {
        let mut index = Self::default();

        for fs in foreshadowings {
            index.statuses.insert(fs.id.clone(), fs.status);

            for entry in fs.events() {
                index
                    .events_by_episode
                    .entry(episode_number(&entry.episode))
                    .or_default()
                    .push(TimelineEvent::from_entry(fs, entry));
                index.total_events += 1;
            }

            if let Some(last) = fs.last_event() {
                match index.last_mention.iter_mut().find(|(id, _)| *id == fs.id) {
                    Some(mention) => mention.1 = last.episode.clone(),
                    None => index
                        .last_mention
                        .push((fs.id.clone(), last.episode.clone())),
                }
            }
        }

        tracing::debug!(
            foreshadowings = foreshadowings.len(),
            episodes = index.events_by_episode.len(),
            events = index.total_events,
            "Built timeline index"
        );
        index
    }

    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Number of distinct episodes with at least one event.
    pub fn episode_count(&self) -> usize {
        self.events_by_episode.len()
    }

    /// Episode numbers with events, ascending.
    pub fn episodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.events_by_episode.keys().copied()
    }

    /// Episode of the latest mention of a foreshadowing.
    pub fn last_mention(&self, foreshadowing_id: &str) -> Option<&str> {
        self.last_mention
            .iter()
            .find(|(id, _)| id == foreshadowing_id)
            .map(|(_, episode)| episode.as_str())
    }

    /// Events in the episode denoted by `episode` (any identifier form).
    pub fn get_events_for_episode(&self, episode: &str) -> &[TimelineEvent] {
        self.events_by_episode
            .get(&episode_number(episode))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All events of one foreshadowing, in episode order.
    pub fn events_for_foreshadowing(&self, foreshadowing_id: &str) -> Vec<&TimelineEvent> {
        self.events_by_episode
            .values()
            .flatten()
            .filter(|e| e.foreshadowing_id == foreshadowing_id)
            .collect()
    }

    /// Active foreshadowings not mentioned for at least `threshold` episodes.
    ///
    /// Returns `(id, silence)` pairs, longest silence first; equal silences
    /// keep the order the foreshadowings were passed to [`build`](Self::build). Only
    /// foreshadowings whose status at build time is in `active_statuses` are
    /// reported.
    pub fn get_silent_foreshadowings(
        &self,
        current_episode: &str,
        threshold: i64,
        active_statuses: &[ForeshadowingStatus],
    ) -> Vec<(String, i64)> {
        let mut silent: Vec<(String, i64)> = self
            .last_mention
            .iter()
            .filter(|(id, _)| {
                self.statuses
                    .get(id.as_str())
                    .is_some_and(|status| active_statuses.contains(status))
            })
            .map(|(id, last)| (id.clone(), episode_distance(last, current_episode)))
            .filter(|(_, silence)| *silence >= threshold)
            .collect();

        silent.sort_by(|a, b| b.1.cmp(&a.1));
        silent
    }

    /// Foreshadowings whose planned payoff is within `threshold` episodes ahead.
    ///
    /// Returns `(id, remaining)` pairs, soonest first; payoffs in the current
    /// or past episodes are excluded.
    pub fn get_approaching_payoffs(
        &self,
        current_episode: &str,
        foreshadowings: &[Foreshadowing],
        threshold: i64,
    ) -> Vec<(String, i64)> {
        let mut approaching: Vec<(String, i64)> = foreshadowings
            .iter()
            .filter_map(|fs| {
                let planned = fs.planned_payoff_episode()?;
                let remaining = episode_distance(current_episode, planned);
                (remaining > 0 && remaining <= threshold).then(|| (fs.id.clone(), remaining))
            })
            .collect();

        approaching.sort_by_key(|(_, remaining)| *remaining);
        approaching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_model::{TimelineEntry, TimelineEventType};

    fn planted(id: &str, episodes: &[&str]) -> Foreshadowing {
        episodes.iter().fold(
            Foreshadowing::new(id, format!("title {}", id)).with_status(ForeshadowingStatus::Planted),
            |fs, ep| fs.with_event(TimelineEntry::new(*ep, TimelineEventType::Hint)),
        )
    }

    #[test]
    fn test_build_counts() {
        let index = TimelineIndex::build(&[
            planted("FS-001", &["ep001", "ep003"]),
            planted("FS-002", &["ep003"]),
            Foreshadowing::new("FS-003", "no events"),
        ]);
        assert_eq!(index.total_events(), 3);
        assert_eq!(index.episode_count(), 2);
        assert_eq!(index.episodes().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(index.last_mention("FS-001"), Some("ep003"));
        assert!(index.last_mention("FS-003").is_none());
    }

    #[test]
    fn test_events_for_episode_any_form() {
        let index = TimelineIndex::build(&[
            planted("FS-001", &["ep010"]),
            planted("FS-002", &["10"]),
        ]);
        let events = index.get_events_for_episode("010");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].foreshadowing_id, "FS-001");
        assert_eq!(events[1].foreshadowing_id, "FS-002");
        assert!(index.get_events_for_episode("ep011").is_empty());
    }

    #[test]
    fn test_last_mention_highest_number() {
        let index = TimelineIndex::build(&[planted("FS-001", &["ep012", "ep004"])]);
        assert_eq!(index.last_mention("FS-001"), Some("ep012"));
    }

    #[test]
    fn test_silent_foreshadowing() {
        let index = TimelineIndex::build(&[planted("FS-001", &["ep005"])]);
        let silent = index.get_silent_foreshadowings("ep010", 5, &DEFAULT_ACTIVE_STATUSES);
        assert_eq!(silent, vec![("FS-001".to_string(), 5)]);
        assert!(index
            .get_silent_foreshadowings("ep009", 5, &DEFAULT_ACTIVE_STATUSES)
            .is_empty());
    }

    #[test]
    fn test_silent_sorted_descending() {
        let index = TimelineIndex::build(&[
            planted("FS-A", &["ep008"]),
            planted("FS-B", &["ep001"]),
            planted("FS-C", &["ep004"]),
        ]);
        let silent = index.get_silent_foreshadowings("ep020", 5, &DEFAULT_ACTIVE_STATUSES);
        let ids: Vec<_> = silent.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["FS-B", "FS-C", "FS-A"]);
        assert_eq!(silent[0].1, 19);
    }

    #[test]
    fn test_silent_ties_keep_build_order() {
        let index = TimelineIndex::build(&[
            planted("FS-Z", &["ep002"]),
            planted("FS-A", &["ep002"]),
            planted("FS-M", &["ep001"]),
        ]);
        let silent = index.get_silent_foreshadowings("ep010", 5, &DEFAULT_ACTIVE_STATUSES);
        let ids: Vec<_> = silent.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["FS-M", "FS-Z", "FS-A"]);
    }

    #[test]
    fn test_silent_respects_active_statuses() {
        let revealed = planted("FS-R", &["ep001"]).with_status(ForeshadowingStatus::Revealed);
        let index = TimelineIndex::build(&[revealed, planted("FS-P", &["ep001"])]);

        let silent = index.get_silent_foreshadowings("ep010", 5, &DEFAULT_ACTIVE_STATUSES);
        assert_eq!(silent, vec![("FS-P".to_string(), 9)]);

        let all = index.get_silent_foreshadowings(
            "ep010",
            5,
            &[ForeshadowingStatus::Planted, ForeshadowingStatus::Revealed],
        );
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_approaching_payoffs() {
        let fs = vec![
            Foreshadowing::new("later", "t").with_payoff("p", Some("ep013")),
            Foreshadowing::new("soon", "t").with_payoff("p", Some("ep011")),
            Foreshadowing::new("too-far", "t").with_payoff("p", Some("ep014")),
            Foreshadowing::new("now", "t").with_payoff("p", Some("ep010")),
            Foreshadowing::new("unplanned", "t").with_payoff("p", None),
        ];
        let index = TimelineIndex::build(&fs);
        let approaching = index.get_approaching_payoffs("ep010", &fs, 3);
        assert_eq!(
            approaching,
            vec![("soon".to_string(), 1), ("later".to_string(), 3)]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let fs = vec![planted("FS-001", &["ep001", "ep002"]), planted("FS-002", &["ep002"])];
        assert_eq!(TimelineIndex::build(&fs), TimelineIndex::build(&fs));
    }

    #[test]
    fn test_stale_after_mutation() {
        let mut fs = vec![planted("FS-001", &["ep001"])];
        let index = TimelineIndex::build(&fs);
        fs[0].add_timeline_event(TimelineEntry::new("ep009", TimelineEventType::Reinforce));

        assert_eq!(index.last_mention("FS-001"), Some("ep001"));
        assert_eq!(TimelineIndex::build(&fs).last_mention("FS-001"), Some("ep009"));
    }

    #[test]
    fn test_events_for_foreshadowing() {
        let index = TimelineIndex::build(&[
            planted("FS-001", &["ep003", "ep001"]),
            planted("FS-002", &["ep002"]),
        ]);
        let events = index.events_for_foreshadowing("FS-001");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].episode, "ep001");
    }
}
