//! The per-scene facade over the information control layer.

use serde::Serialize;

use story_model::{EntityVisibilityConfig, VisibilityConfig};

use crate::config::InfoControlConfig;
use crate::context_filter::{FilteredContext, VisibilityController};
use crate::error::{ControlError, ControlResult};
use crate::foreshadowing::{ForeshadowInstructions, ForeshadowingRegistry};
use crate::review::{
    format_fallback_report, review_with_context, should_fallback, FallbackReport, ReviewResult,
};
use crate::timeline::DEFAULT_ACTIVE_STATUSES;
use crate::vault::{ForbiddenKeywordCollector, ForbiddenKeywordResult, LoadPriority, VaultLoader};

/// Everything the drafting model may see for one scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneContext {
    pub scene_id: String,
    pub keywords: ForbiddenKeywordResult,
    pub filtered: FilteredContext,
}

impl SceneContext {
    pub fn forbidden_keywords(&self) -> &[String] {
        &self.filtered.forbidden_keywords
    }

    pub fn to_prompt_string(&self) -> String {
        self.filtered.to_prompt_string()
    }
}

/// Outcome of reviewing one draft.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewDecision {
    /// The draft passed.
    Accepted(ReviewResult),
    /// The draft failed and may be regenerated.
    Retry(ReviewResult),
    /// Retries are exhausted.
    HumanFallback(FallbackReport),
}

impl ReviewDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ReviewDecision::Accepted(_))
    }
}

/// Foreshadowings that need attention at the current episode.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PacingReport {
    pub current_episode: String,
    /// `(id, episodes since last mention)`, longest first.
    pub silent: Vec<(String, i64)>,
    /// `(id, episodes until payoff)`, soonest first.
    pub approaching: Vec<(String, i64)>,
}

/// Ties configuration, vault access, filtering and review together.
pub struct InformationController<L> {
    config: InfoControlConfig,
    loader: L,
}

impl<L: VaultLoader> InformationController<L> {
    pub fn new(config: InfoControlConfig, loader: L) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &InfoControlConfig {
        &self.config
    }

    /// Load the work's visibility configuration; absent means default.
    pub fn load_visibility_config(&self) -> ControlResult<VisibilityConfig> {
        let path = self.config.vault.visibility_path();
        match self.loader.load_optional(&path, LoadPriority::Critical) {
            Some(yaml) => VisibilityConfig::from_yaml(&yaml).map_err(|e| {
                ControlError::parse(format!("invalid visibility config '{}': {}", path, e))
            }),
            None => Ok(VisibilityConfig::default()),
        }
    }

    /// Collect the scene's forbidden keywords and filter `document` with them.
    pub fn build_scene_context(
        &self,
        scene_id: &str,
        document: &str,
        entity: Option<&EntityVisibilityConfig>,
        instructions: Option<&ForeshadowInstructions>,
    ) -> SceneContext {
        let collector = ForbiddenKeywordCollector::new(&self.loader, self.config.vault.clone());
        let keywords = collector.collect(scene_id, instructions);

        let filtered = VisibilityController::new(self.config.filter.default_level)
            .with_forbidden_keywords(keywords.keywords.iter().cloned())
            .filter_with_config(document, entity);

        tracing::info!(
            scene_id = %scene_id,
            forbidden = filtered.forbidden_keywords.len(),
            excluded = filtered.excluded_sections.len(),
            "Built scene context"
        );

        SceneContext {
            scene_id: scene_id.to_string(),
            keywords,
            filtered,
        }
    }

    /// Review a draft.
    ///
    /// `retry_count` is the number of regenerations already spent on the
    /// scene. A rejected draft goes to a human once that reaches
    /// `review.max_retries`.
    pub fn review_draft<S: AsRef<str>>(
        &self,
        draft: &str,
        forbidden: &[S],
        retry_count: u32,
    ) -> ReviewDecision {
        let result = review_with_context(draft, forbidden, self.config.filter.context_chars);
        if result.is_approved() {
            return ReviewDecision::Accepted(result);
        }
        if should_fallback(retry_count, self.config.review.max_retries) {
            return ReviewDecision::HumanFallback(format_fallback_report(retry_count, Some(&result)));
        }
        tracing::debug!(retry_count, issues = result.issues.len(), "Draft needs regeneration");
        ReviewDecision::Retry(result)
    }

    /// Silence and payoff pacing at `current_episode`.
    pub fn pacing_report(
        &self,
        registry: &ForeshadowingRegistry,
        current_episode: &str,
    ) -> PacingReport {
        let index = registry.build_index();
        let settings = &self.config.timeline;
        PacingReport {
            current_episode: current_episode.to_string(),
            silent: index.get_silent_foreshadowings(
                current_episode,
                settings.silence_threshold,
                &DEFAULT_ACTIVE_STATUSES,
            ),
            approaching: index.get_approaching_payoffs(
                current_episode,
                registry.all(),
                settings.payoff_threshold,
            ),
        }
    }
}
