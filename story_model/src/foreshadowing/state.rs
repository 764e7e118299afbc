//! Foreshadowing state machine and the visibility policies derived from it.
//!
//! ```text
//! REGISTERED -> PLANTED
//! PLANTED    -> REINFORCED | REVEALED
//! REINFORCED -> PLANTED | REVEALED
//! REVEALED   (terminal)
//! ```
//!
//! Self-loops are always permitted.

use super::{Foreshadowing, ForeshadowingStatus, Subtlety};
use crate::error::{ModelError, ModelResult};
use crate::visibility::VisibilityLevel;

impl ForeshadowingStatus {
    /// Statuses reachable in one step (excluding the self-loop).
    pub fn successors(&self) -> &'static [ForeshadowingStatus] {
        use ForeshadowingStatus::*;
        match self {
            Registered => &[Planted],
            Planted => &[Reinforced, Revealed],
            Reinforced => &[Planted, Revealed],
            Revealed => &[],
        }
    }

    /// Check whether the move `self -> to` is allowed.
    pub fn can_transition_to(&self, to: ForeshadowingStatus) -> bool {
        *self == to || self.successors().contains(&to)
    }

    /// Visibility recommended for a foreshadowing in this status.
    pub fn recommended_visibility(&self) -> VisibilityLevel {
        match self {
            ForeshadowingStatus::Registered => VisibilityLevel::Hidden,
            ForeshadowingStatus::Planted => VisibilityLevel::Know,
            ForeshadowingStatus::Reinforced => VisibilityLevel::Know,
            ForeshadowingStatus::Revealed => VisibilityLevel::Use,
        }
    }
}

impl Subtlety {
    /// Highly subtle hints (8 and above) only let the model know something is there.
    pub fn mapped_visibility(&self) -> VisibilityLevel {
        if self.value() >= 8 {
            VisibilityLevel::Aware
        } else {
            VisibilityLevel::Know
        }
    }
}

/// Check whether a status transition is allowed.
pub fn validate_status_transition(from: ForeshadowingStatus, to: ForeshadowingStatus) -> bool {
    from.can_transition_to(to)
}

/// Visibility recommended for a status.
pub fn status_recommended_visibility(status: ForeshadowingStatus) -> VisibilityLevel {
    status.recommended_visibility()
}

/// Map a raw subtlety rating to a visibility level, rejecting values outside `1..=10`.
pub fn subtlety_to_visibility(subtlety: i64) -> ModelResult<VisibilityLevel> {
    Ok(Subtlety::new(subtlety)?.mapped_visibility())
}

impl Foreshadowing {
    /// Visibility the drafting model actually gets for this foreshadowing.
    ///
    /// A revealed foreshadowing is in the text already, so it is always USE.
    /// Otherwise the status recommendation, the subtlety mapping, and any
    /// explicit level are combined and the most restrictive one wins.
    pub fn effective_visibility(&self) -> VisibilityLevel {
        if self.status == ForeshadowingStatus::Revealed {
            return VisibilityLevel::Use;
        }

        let derived = self
            .status
            .recommended_visibility()
            .meet(self.subtlety_level.mapped_visibility());

        match self.ai_visibility.level {
            Some(explicit) => derived.meet(explicit),
            None => derived,
        }
    }

    /// Return a copy moved to `to`.
    ///
    /// With `update_visibility` the explicit level is reset to the status
    /// recommendation.
    pub fn transition_status(
        &self,
        to: ForeshadowingStatus,
        update_visibility: bool,
    ) -> ModelResult<Foreshadowing> {
        if !self.status.can_transition_to(to) {
            return Err(ModelError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        let mut next = self.clone();
        next.status = to;
        if update_visibility {
            next.ai_visibility.level = Some(to.recommended_visibility());
        }
        Ok(next)
    }

    /// Move to PLANTED and update the visibility.
    pub fn plant(&self) -> ModelResult<Foreshadowing> {
        self.transition_status(ForeshadowingStatus::Planted, true)
    }

    /// Move to REINFORCED and update the visibility.
    pub fn reinforce(&self) -> ModelResult<Foreshadowing> {
        self.transition_status(ForeshadowingStatus::Reinforced, true)
    }

    /// Move to REVEALED; visibility becomes USE.
    pub fn reveal(&self) -> ModelResult<Foreshadowing> {
        self.transition_status(ForeshadowingStatus::Revealed, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ForeshadowingStatus::*;

    const ALL: [ForeshadowingStatus; 4] = [Registered, Planted, Reinforced, Revealed];

    fn fs(status: ForeshadowingStatus, subtlety: i64) -> Foreshadowing {
        Foreshadowing::new("FS-001", "test")
            .with_status(status)
            .with_subtlety(subtlety)
            .unwrap()
    }

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Registered, Planted),
            (Planted, Reinforced),
            (Planted, Revealed),
            (Reinforced, Planted),
            (Reinforced, Revealed),
        ];
        for from in ALL {
            for to in ALL {
                let expected = from == to || allowed.contains(&(from, to));
                assert_eq!(
                    validate_status_transition(from, to),
                    expected,
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_self_loops_allowed() {
        for status in ALL {
            assert!(validate_status_transition(status, status));
        }
    }

    #[test]
    fn test_registered_cannot_reveal() {
        let err = fs(Registered, 5).transition_status(Revealed, false).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidTransition {
                from: Registered,
                to: Revealed
            }
        );
    }

    #[test]
    fn test_transition_returns_new_value() {
        let original = fs(Registered, 5);
        let planted = original.transition_status(Planted, false).unwrap();
        assert_eq!(original.status, Registered);
        assert_eq!(planted.status, Planted);
        assert!(planted.ai_visibility.level.is_none());

        let updated = original.transition_status(Planted, true).unwrap();
        assert_eq!(updated.ai_visibility.level, Some(VisibilityLevel::Know));
    }

    #[test]
    fn test_subtlety_mapping() {
        for s in 1..=7 {
            assert_eq!(subtlety_to_visibility(s).unwrap(), VisibilityLevel::Know);
        }
        for s in 8..=10 {
            assert_eq!(subtlety_to_visibility(s).unwrap(), VisibilityLevel::Aware);
        }
        assert!(subtlety_to_visibility(0).is_err());
        assert!(subtlety_to_visibility(11).is_err());
    }

    #[test]
    fn test_status_recommendations() {
        assert_eq!(status_recommended_visibility(Registered), VisibilityLevel::Hidden);
        assert_eq!(status_recommended_visibility(Planted), VisibilityLevel::Know);
        assert_eq!(status_recommended_visibility(Reinforced), VisibilityLevel::Know);
        assert_eq!(status_recommended_visibility(Revealed), VisibilityLevel::Use);
    }

    #[test]
    fn test_effective_visibility_subtle_planted() {
        assert_eq!(fs(Planted, 9).effective_visibility(), VisibilityLevel::Aware);
        assert_eq!(fs(Planted, 3).effective_visibility(), VisibilityLevel::Know);
        assert_eq!(fs(Registered, 3).effective_visibility(), VisibilityLevel::Hidden);
    }

    #[test]
    fn test_revealed_is_always_use() {
        for s in 1..=10 {
            let revealed = fs(Revealed, s).with_visibility_level(VisibilityLevel::Hidden);
            assert_eq!(revealed.effective_visibility(), VisibilityLevel::Use);
        }
    }

    #[test]
    fn test_effective_never_exceeds_components() {
        for status in [Registered, Planted, Reinforced] {
            for s in 1..=10 {
                for explicit in VisibilityLevel::ALL {
                    let f = fs(status, s).with_visibility_level(explicit);
                    let effective = f.effective_visibility();
                    assert!(effective <= status.recommended_visibility());
                    assert!(effective <= f.subtlety_level.mapped_visibility());
                    assert!(effective <= explicit);
                }
            }
        }
    }

    #[test]
    fn test_plant_and_reveal_shortcuts() {
        let planted = fs(Registered, 4).plant().unwrap();
        assert_eq!(planted.status, Planted);
        assert_eq!(planted.ai_visibility.level, Some(VisibilityLevel::Know));

        let reinforced = planted.reinforce().unwrap();
        assert_eq!(reinforced.status, Reinforced);

        let revealed = reinforced.reveal().unwrap();
        assert_eq!(revealed.status, Revealed);
        assert_eq!(revealed.ai_visibility.level, Some(VisibilityLevel::Use));
        assert_eq!(revealed.effective_visibility(), VisibilityLevel::Use);

        assert!(revealed.plant().is_err());
    }
}
