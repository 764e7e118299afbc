//! Inline visibility markers: `<!-- ai_visibility: N -->`.
//!
//! A marker applies to the nearest preceding markdown header. Matching is
//! case-insensitive and tolerant of whitespace.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::sync::OnceLock;

use story_model::VisibilityLevel;

use super::header_name;
use crate::error::{ControlError, ControlResult};

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)<!--\s*ai_visibility:\s*(\S+)\s*-->").expect("marker pattern is valid")
    })
}

/// A visibility marker found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMarker {
    pub level: VisibilityLevel,

    /// 1-indexed line of the marker.
    pub line_number: usize,

    /// Header of the section the marker belongs to, if any.
    pub section_name: Option<String>,
}

/// Raw level literal of the first marker on a line.
fn marker_literal(line: &str) -> Option<&str> {
    marker_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn parse_level(literal: &str, line_number: usize) -> ControlResult<VisibilityLevel> {
    literal.parse::<VisibilityLevel>().map_err(|e| {
        ControlError::parse(format!(
            "invalid ai_visibility level '{}' on line {}: {}",
            literal, line_number, e
        ))
    })
}

/// Collect every marker in `content`.
///
/// Fails on the first marker whose level is not a valid visibility level.
pub fn parse_visibility_comments(content: &str) -> ControlResult<Vec<VisibilityMarker>> {
    let mut markers = Vec::new();
    let mut current_section: Option<String> = None;

    for (idx, line) in content.lines().enumerate() {
        if let Some(name) = header_name(line) {
            current_section = Some(name);
            continue;
        }
        if let Some(literal) = marker_literal(line) {
            markers.push(VisibilityMarker {
                level: parse_level(literal, idx + 1)?,
                line_number: idx + 1,
                section_name: current_section.clone(),
            });
        }
    }

    Ok(markers)
}

/// Section name to visibility level, in document order.
///
/// A repeated header keeps its first position and takes the latest level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionLevels(Vec<(String, VisibilityLevel)>);

impl SectionLevels {
    pub fn get(&self, section_name: &str) -> Option<VisibilityLevel> {
        self.0
            .iter()
            .find(|(name, _)| name == section_name)
            .map(|(_, level)| *level)
    }

    pub fn insert(&mut self, section_name: String, level: VisibilityLevel) {
        match self.0.iter_mut().find(|(name, _)| *name == section_name) {
            Some(entry) => entry.1 = level,
            None => self.0.push((section_name, level)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VisibilityLevel)> + '_ {
        self.0.iter().map(|(name, level)| (name.as_str(), *level))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for SectionLevels {
    type Output = VisibilityLevel;

    fn index(&self, section_name: &str) -> &VisibilityLevel {
        match self.0.iter().find(|(name, _)| name == section_name) {
            Some((_, level)) => level,
            None => panic!("no section named '{}'", section_name),
        }
    }
}

/// Map each section header to its visibility level.
///
/// Every header opens a section at `default`; a marker before the next header
/// overrides it. Invalid markers are ignored and leave the section unchanged.
pub fn extract_section_visibility(content: &str, default: VisibilityLevel) -> SectionLevels {
    let mut sections = SectionLevels::default();
    let mut current_section: Option<String> = None;

    for (idx, line) in content.lines().enumerate() {
        if let Some(name) = header_name(line) {
            sections.insert(name.clone(), default);
            current_section = Some(name);
            continue;
        }

        let (Some(section), Some(literal)) = (current_section.as_ref(), marker_literal(line)) else {
            continue;
        };
        match parse_level(literal, idx + 1) {
            Ok(level) => {
                sections.insert(section.clone(), level);
            }
            Err(e) => {
                tracing::warn!(section = %section, error = %e, "Ignoring invalid visibility marker");
            }
        }
    }

    sections
}

/// Level set by markers inside a section body, if any (last valid marker wins).
pub(crate) fn body_marker_level(body: &str) -> Option<VisibilityLevel> {
    body.lines()
        .filter_map(marker_literal)
        .filter_map(|literal| literal.parse::<VisibilityLevel>().ok())
        .last()
}
