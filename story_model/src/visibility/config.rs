//! Work-scoped visibility configuration (`_ai_control/visibility.yaml`).

use serde::{Deserialize, Serialize};

use super::{AllowedExpression, VisibilityLevel};

fn default_version() -> String {
    "1.0".to_string()
}

/// Visibility of a single section inside an entity document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionVisibility {
    pub section_name: String,

    #[serde(default)]
    pub level: VisibilityLevel,

    /// Strings the draft must not contain when this section is in context.
    #[serde(default)]
    pub forbidden_keywords: Vec<String>,

    #[serde(default)]
    pub allowed_expressions: Vec<AllowedExpression>,
}

impl SectionVisibility {
    /// Create a section entry. New sections start HIDDEN.
    pub fn new(section_name: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            level: VisibilityLevel::Hidden,
            forbidden_keywords: Vec::new(),
            allowed_expressions: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: VisibilityLevel) -> Self {
        self.level = level;
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
}

/// Visibility configuration for one entity (a character, a location, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityVisibilityConfig {
    pub entity_type: String,
    pub entity_name: String,

    #[serde(default)]
    pub default_level: VisibilityLevel,

    #[serde(default)]
    pub sections: Vec<SectionVisibility>,
}

impl EntityVisibilityConfig {
    /// Create an entity entry. New entities start HIDDEN.
    pub fn new(entity_type: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_name: entity_name.into(),
            default_level: VisibilityLevel::Hidden,
            sections: Vec::new(),
        }
    }

    pub fn with_default_level(mut self, level: VisibilityLevel) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_section(mut self, section: SectionVisibility) -> Self {
        self.sections.push(section);
        self
    }

    /// Look up a section by name.
    pub fn get_section(&self, section_name: &str) -> Option<&SectionVisibility> {
        self.sections
            .iter()
            .find(|s| s.section_name == section_name)
    }

    /// Level of a section, falling back to the entity default.
    pub fn section_level(&self, section_name: &str) -> VisibilityLevel {
        self.get_section(section_name)
            .map(|s| s.level)
            .unwrap_or(self.default_level)
    }

    /// Union of all section keywords, in first-seen order.
    pub fn all_forbidden_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in self.sections.iter().flat_map(|s| &s.forbidden_keywords) {
            if !keywords.contains(keyword) {
                keywords.push(keyword.clone());
            }
        }
        keywords
    }
}

/// The complete visibility document for a work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub default_visibility: VisibilityLevel,

    #[serde(default)]
    pub global_forbidden_keywords: Vec<String>,

    #[serde(default)]
    pub entities: Vec<EntityVisibilityConfig>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_visibility: VisibilityLevel::Hidden,
            global_forbidden_keywords: Vec::new(),
            entities: Vec::new(),
        }
    }
}

impl VisibilityConfig {
    /// Create an empty configuration (default visibility HIDDEN).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML. Unknown keys are ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Find an entity by type and name.
    pub fn get_entity(
        &self,
        entity_type: &str,
        entity_name: &str,
    ) -> Option<&EntityVisibilityConfig> {
        self.entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.entity_name == entity_name)
    }

    /// Add or replace an entity entry.
    pub fn upsert_entity(&mut self, entity: EntityVisibilityConfig) {
        match self.entities.iter_mut().find(|e| {
            e.entity_type == entity.entity_type && e.entity_name == entity.entity_name
        }) {
            Some(existing) => *existing = entity,
            None => self.entities.push(entity),
        }
    }
}
