//! Configuration for the information control layer.
//!
//! Loaded from TOML; every key is optional and falls back to its default.
//!
//! ```toml
//! [filter]
//! context_chars = 20
//! default_level = 3
//!
//! [timeline]
//! silence_threshold = 5
//! payoff_threshold = 3
//!
//! [review]
//! max_retries = 3
//!
//! [vault]
//! ai_control_dir = "_ai_control"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use story_model::VisibilityLevel;

use crate::error::{ControlError, ControlResult};
use crate::expression_filter::DEFAULT_CONTEXT_CHARS;
use crate::review::DEFAULT_MAX_RETRIES;
use crate::timeline::{DEFAULT_PAYOFF_THRESHOLD, DEFAULT_SILENCE_THRESHOLD};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoControlConfig {
    pub filter: FilterSettings,
    pub timeline: TimelineSettings,
    pub review: ReviewSettings,
    pub vault: VaultSettings,
}

impl InfoControlConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(text: &str) -> ControlResult<Self> {
        toml::from_str(text).map_err(|e| ControlError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ControlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ControlError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> ControlResult<String> {
        toml::to_string(self).map_err(|e| ControlError::Config(e.to_string()))
    }
}

/// Section filter and expression filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Characters of context on each side of a keyword match.
    pub context_chars: usize,

    /// Level of sections without a marker or configured level.
    pub default_level: VisibilityLevel,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            default_level: VisibilityLevel::Use,
        }
    }
}

/// Pacing thresholds for timeline queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub silence_threshold: i64,
    pub payoff_threshold: i64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            payoff_threshold: DEFAULT_PAYOFF_THRESHOLD,
        }
    }
}

/// Review loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Failed reviews allowed before handing the scene to a human.
    pub max_retries: u32,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Locations of control files inside the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    pub ai_control_dir: String,
    pub visibility_file: String,
    pub forbidden_keywords_file: String,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            ai_control_dir: "_ai_control".to_string(),
            visibility_file: "visibility.yaml".to_string(),
            forbidden_keywords_file: "forbidden_keywords.txt".to_string(),
        }
    }
}

impl VaultSettings {
    /// Vault-relative path of the visibility configuration.
    pub fn visibility_path(&self) -> String {
        format!("{}/{}", self.ai_control_dir, self.visibility_file)
    }

    /// Vault-relative path of the forbidden keywords list.
    pub fn forbidden_keywords_path(&self) -> String {
        format!("{}/{}", self.ai_control_dir, self.forbidden_keywords_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InfoControlConfig::default();
        assert_eq!(config.filter.context_chars, 20);
        assert_eq!(config.filter.default_level, VisibilityLevel::Use);
        assert_eq!(config.timeline.silence_threshold, 5);
        assert_eq!(config.timeline.payoff_threshold, 3);
        assert_eq!(config.review.max_retries, 3);
        assert_eq!(config.vault.visibility_path(), "_ai_control/visibility.yaml");
        assert_eq!(
            config.vault.forbidden_keywords_path(),
            "_ai_control/forbidden_keywords.txt"
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = InfoControlConfig::from_toml_str(
            "[timeline]\nsilence_threshold = 8\n\n[filter]\ndefault_level = \"know\"\n",
        )
        .unwrap();
        assert_eq!(config.timeline.silence_threshold, 8);
        assert_eq!(config.timeline.payoff_threshold, 3);
        assert_eq!(config.filter.default_level, VisibilityLevel::Know);
        assert_eq!(config.review.max_retries, 3);
    }

    #[test]
    fn test_invalid_toml() {
        let err = InfoControlConfig::from_toml_str("[filter]\ndefault_level = 9\n").unwrap_err();
        assert!(matches!(err, ControlError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_and_file() {
        let mut config = InfoControlConfig::default();
        config.review.max_retries = 5;
        let text = config.to_toml_string().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info_control.toml");
        std::fs::write(&path, text).unwrap();
        assert_eq!(InfoControlConfig::from_toml_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = InfoControlConfig::from_toml_file("/nonexistent/info_control.toml").unwrap_err();
        assert!(matches!(err, ControlError::Load { .. }));
    }
}
