//! Context Filter - applies per-section visibility to a document before it
//! reaches the drafting model.
//!
//! Each section ends up in one of four shapes:
//! 1. **USE**: header and body verbatim
//! 2. **KNOW**: header and body verbatim, section keywords become forbidden
//! 3. **AWARE**: header only, plus a hint that something is hidden there
//! 4. **HIDDEN**: dropped entirely and recorded as excluded

mod section;

pub use section::*;

use serde::{Deserialize, Serialize};

use story_model::{AllowedExpression, EntityVisibilityConfig, VisibilityLevel};

use crate::markup::body_marker_level;

/// Hint emitted for an AWARE section.
pub fn aware_hint(section_name: &str) -> String {
    format!("there is hidden information in section '{}'", section_name)
}

/// The subset of a document that is safe to send to the drafting model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilteredContext {
    pub content: String,
    pub hints: Vec<String>,
    pub forbidden_keywords: Vec<String>,
    pub excluded_sections: Vec<String>,

    /// Paraphrases configured for KNOW sections.
    #[serde(default)]
    pub allowed_expressions: Vec<AllowedExpression>,
}

impl FilteredContext {
    /// Whether anything was withheld or restricted.
    pub fn has_restrictions(&self) -> bool {
        !self.excluded_sections.is_empty()
            || !self.hints.is_empty()
            || !self.forbidden_keywords.is_empty()
    }

    /// Format the context as a prompt block.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Reference\n");
        prompt.push_str(&self.content);
        prompt.push_str("\n\n");

        if !self.hints.is_empty() {
            prompt.push_str("## Hidden Information\n");
            for hint in &self.hints {
                prompt.push_str(&format!("- {}\n", hint));
            }
            prompt.push('\n');
        }

        if !self.forbidden_keywords.is_empty() {
            prompt.push_str("## Forbidden Expressions\n");
            prompt.push_str("Do not use any of the following in the text:\n");
            for keyword in &self.forbidden_keywords {
                prompt.push_str(&format!("- {}\n", keyword));
            }
            prompt.push('\n');
        }

        if !self.allowed_expressions.is_empty() {
            prompt.push_str("## Allowed Expressions\n");
            for allowed in &self.allowed_expressions {
                match &allowed.context {
                    Some(context) => {
                        prompt.push_str(&format!("- {} ({})\n", allowed.expression, context))
                    }
                    None => prompt.push_str(&format!("- {}\n", allowed.expression)),
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

/// Builds filtered contexts from markdown documents.
#[derive(Debug, Clone)]
pub struct VisibilityController {
    default_level: VisibilityLevel,
    global_forbidden_keywords: Vec<String>,
    hints: Vec<String>,
}

impl Default for VisibilityController {
    fn default() -> Self {
        Self::new(VisibilityLevel::Use)
    }
}

impl VisibilityController {
    /// Create a controller; sections without a marker get `default_level`.
    pub fn new(default_level: VisibilityLevel) -> Self {
        Self {
            default_level,
            global_forbidden_keywords: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Keywords forbidden regardless of section levels.
    pub fn with_forbidden_keywords(mut self, keywords: impl IntoIterator<Item = String>) -> Self {
        self.global_forbidden_keywords.extend(keywords);
        self
    }

    /// Hints placed before any generated hint.
    pub fn with_hints(mut self, hints: impl IntoIterator<Item = String>) -> Self {
        self.hints.extend(hints);
        self
    }

    pub fn default_level(&self) -> VisibilityLevel {
        self.default_level
    }

    /// Filter a document using only its inline markers.
    pub fn filter(&self, content: &str) -> FilteredContext {
        self.filter_with_config(content, None)
    }

    /// Filter a document using its inline markers and, when given, the
    /// entity's configured section levels and keywords.
    ///
    /// When a section has both a marker and a configured level, the more
    /// restrictive one applies.
    pub fn filter_with_config(
        &self,
        content: &str,
        entity: Option<&EntityVisibilityConfig>,
    ) -> FilteredContext {
        let mut kept: Vec<&str> = Vec::new();
        let mut context = FilteredContext {
            hints: self.hints.clone(),
            ..Default::default()
        };
        for keyword in &self.global_forbidden_keywords {
            push_unique(&mut context.forbidden_keywords, keyword);
        }

        let sections = split_sections(content);
        for section in &sections {
            let Some(name) = section.name.as_deref() else {
                // Text before the first header follows the default level.
                if self.default_level.reveals_content() {
                    kept.extend(section.lines());
                }
                continue;
            };

            let configured = entity.and_then(|e| e.get_section(name));
            let level = match (body_marker_level(&section.body_text()), configured) {
                (Some(marker), Some(config)) => marker.meet(config.level),
                (Some(marker), None) => marker,
                (None, Some(config)) => config.level,
                (None, None) => self.default_level,
            };

            if level.reveals_content() {
                kept.extend(section.lines());
                // KNOW: the content is usable as background but may not be stated.
                if let (VisibilityLevel::Know, Some(config)) = (level, configured) {
                    for keyword in &config.forbidden_keywords {
                        push_unique(&mut context.forbidden_keywords, keyword);
                    }
                    context
                        .allowed_expressions
                        .extend(config.allowed_expressions.iter().cloned());
                }
            } else if level.reveals_existence() {
                kept.extend(section.header.as_deref());
                context.hints.push(aware_hint(name));
            } else {
                context.excluded_sections.push(name.to_string());
            }
        }

        context.content = kept.join("\n");
        tracing::debug!(
            sections = sections.len(),
            excluded = context.excluded_sections.len(),
            hints = context.hints.len(),
            forbidden = context.forbidden_keywords.len(),
            "Filtered context"
        );
        context
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
