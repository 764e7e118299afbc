//! Secrets - story facts the drafting model must not leak.

use serde::{Deserialize, Serialize};

use super::{AllowedExpression, VisibilityLevel};

/// Baseline similarity threshold before importance adjustment.
pub const BASE_SIMILARITY_THRESHOLD: f32 = 0.70;

/// How damaging a leak of the secret would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretImportance {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl SecretImportance {
    /// Offset applied to [`BASE_SIMILARITY_THRESHOLD`].
    ///
    /// More important secrets get a lower threshold, so weaker resemblance
    /// already counts as a leak.
    pub fn threshold_adjustment(&self) -> f32 {
        match self {
            SecretImportance::Critical => -0.15,
            SecretImportance::High => -0.10,
            SecretImportance::Medium => 0.0,
            SecretImportance::Low => 0.05,
        }
    }
}

/// A secret tracked by the information control layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub id: String,
    pub content: String,

    #[serde(default)]
    pub visibility: VisibilityLevel,

    #[serde(default)]
    pub importance: SecretImportance,

    #[serde(default)]
    pub forbidden_keywords: Vec<String>,

    #[serde(default)]
    pub allowed_expressions: Vec<AllowedExpression>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Secret {
    /// Create a new secret. Secrets start HIDDEN with MEDIUM importance.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            visibility: VisibilityLevel::Hidden,
            importance: SecretImportance::Medium,
            forbidden_keywords: Vec::new(),
            allowed_expressions: Vec::new(),
            related_entity: None,
            notes: None,
        }
    }

    pub fn with_visibility(mut self, visibility: VisibilityLevel) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_importance(mut self, importance: SecretImportance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_forbidden_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.forbidden_keywords.push(keyword.into());
        self
    }

    pub fn with_allowed_expression(mut self, expression: AllowedExpression) -> Self {
        self.allowed_expressions.push(expression);
        self
    }

    pub fn with_related_entity(mut self, entity: impl Into<String>) -> Self {
        self.related_entity = Some(entity.into());
        self
    }

    /// Similarity above which a passage is treated as leaking this secret.
    pub fn similarity_threshold(&self) -> f32 {
        (BASE_SIMILARITY_THRESHOLD + self.importance.threshold_adjustment()).clamp(0.0, 1.0)
    }

    /// Whether the content may be placed in the model's context.
    pub fn is_exposable(&self) -> bool {
        self.visibility.reveals_content()
    }
}
