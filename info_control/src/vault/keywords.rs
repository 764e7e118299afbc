//! Forbidden keyword collection for a scene.
//!
//! Keywords come from three sources, consulted in this order:
//! 1. **foreshadowing**: forbidden expressions of the scene's active instructions
//! 2. **visibility**: `global_forbidden_keywords` in the visibility configuration
//! 3. **global**: one keyword per line in the forbidden keywords file
//!
//! Missing or unreadable files contribute nothing.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use story_model::VisibilityConfig;

use super::{LoadPriority, VaultLoader};
use crate::config::VaultSettings;
use crate::foreshadowing::ForeshadowInstructions;

/// Where a forbidden keyword came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSource {
    Foreshadowing,
    Visibility,
    Global,
}

/// Collected keywords for a scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForbiddenKeywordResult {
    pub scene_id: String,

    /// Sorted, deduplicated union of all sources.
    pub keywords: Vec<String>,

    /// Raw contribution of each source.
    pub sources: BTreeMap<KeywordSource, Vec<String>>,
}

impl ForbiddenKeywordResult {
    pub fn source(&self, source: KeywordSource) -> &[String] {
        self.sources.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parse a keyword list file: one keyword per line, `#` comments and blank
/// lines skipped, surrounding whitespace trimmed.
pub fn parse_keyword_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Assembles the forbidden keyword list for a scene from the vault.
pub struct ForbiddenKeywordCollector<L> {
    loader: L,
    settings: VaultSettings,
}

impl<L: VaultLoader> ForbiddenKeywordCollector<L> {
    pub fn new(loader: L, settings: VaultSettings) -> Self {
        Self { loader, settings }
    }

    /// Collect keywords for `scene_id`.
    pub fn collect(
        &self,
        scene_id: &str,
        instructions: Option<&ForeshadowInstructions>,
    ) -> ForbiddenKeywordResult {
        let mut sources = BTreeMap::new();
        sources.insert(
            KeywordSource::Foreshadowing,
            instructions
                .map(ForeshadowInstructions::forbidden_expressions)
                .unwrap_or_default(),
        );
        sources.insert(KeywordSource::Visibility, self.visibility_keywords());
        sources.insert(KeywordSource::Global, self.global_keywords());

        let keywords: Vec<String> = sources
            .values()
            .flatten()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        tracing::debug!(
            scene_id = %scene_id,
            keywords = keywords.len(),
            foreshadowing = sources[&KeywordSource::Foreshadowing].len(),
            visibility = sources[&KeywordSource::Visibility].len(),
            global = sources[&KeywordSource::Global].len(),
            "Collected forbidden keywords"
        );

        ForbiddenKeywordResult {
            scene_id: scene_id.to_string(),
            keywords,
            sources,
        }
    }

    fn visibility_keywords(&self) -> Vec<String> {
        let path = self.settings.visibility_path();
        let Some(yaml) = self.loader.load_optional(&path, LoadPriority::High) else {
            return Vec::new();
        };
        match VisibilityConfig::from_yaml(&yaml) {
            Ok(config) => config.global_forbidden_keywords,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Ignoring unreadable visibility config");
                Vec::new()
            }
        }
    }

    fn global_keywords(&self) -> Vec<String> {
        self.loader
            .load_optional(&self.settings.forbidden_keywords_path(), LoadPriority::High)
            .map(|text| parse_keyword_list(&text))
            .unwrap_or_default()
    }
}
