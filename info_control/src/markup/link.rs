//! Obsidian link parsing: `[[target]]`, `[[target#heading]]`,
//! `[[target#^block]]`, `[[target|display]]` and combinations.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const LINK_PATTERN: &str = r"\[\[([^\]|#]+)(?:#(\^)?([^\]|]+))?(?:\|([^\]]+))?\]\]";

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern is valid"))
}

fn exact_link_regex() -> &'static Regex {
    static EXACT: OnceLock<Regex> = OnceLock::new();
    EXACT.get_or_init(|| {
        Regex::new(&format!("^{}$", LINK_PATTERN)).expect("link pattern is valid")
    })
}

/// A parsed Obsidian wikilink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObsidianLink {
    pub target: String,
    pub display: Option<String>,
    pub heading: Option<String>,
    pub block_id: Option<String>,
}

impl ObsidianLink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            display: None,
            heading: None,
            block_id: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_block_id(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    /// Text shown to the reader; the target when no display text is given.
    pub fn display_text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.target)
    }

    /// Last `/`-delimited segment of the target.
    pub fn filename(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }

    /// Whether the anchor points at a block (`#^id`) rather than a heading.
    pub fn is_block_reference(&self) -> bool {
        self.block_id.is_some()
    }

    /// Render back to wikilink syntax.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("[[{}", self.target);
        if let Some(block_id) = &self.block_id {
            out.push_str("#^");
            out.push_str(block_id);
        } else if let Some(heading) = &self.heading {
            out.push('#');
            out.push_str(heading);
        }
        if let Some(display) = &self.display {
            out.push('|');
            out.push_str(display);
        }
        out.push_str("]]");
        out
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let target = caps.get(1)?.as_str();
        if target.trim().is_empty() {
            return None;
        }
        let is_block = caps.get(2).is_some();
        let anchor = caps.get(3).map(|m| m.as_str().to_string());

        Some(Self {
            target: target.to_string(),
            display: caps.get(4).map(|m| m.as_str().to_string()),
            heading: if is_block { None } else { anchor.clone() },
            block_id: if is_block { anchor } else { None },
        })
    }
}

impl std::fmt::Display for ObsidianLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_markdown())
    }
}

/// Parse a string that consists of exactly one link.
pub fn parse_link(text: &str) -> Option<ObsidianLink> {
    exact_link_regex()
        .captures(text)
        .and_then(|caps| ObsidianLink::from_captures(&caps))
}

/// Extract every link in a markdown document, in order of appearance.
pub fn extract_links(content: &str) -> Vec<ObsidianLink> {
    link_regex()
        .captures_iter(content)
        .filter_map(|caps| ObsidianLink::from_captures(&caps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_link() {
        let link = parse_link("[[characters/アイラ]]").unwrap();
        assert_eq!(link.target, "characters/アイラ");
        assert_eq!(link.display_text(), "characters/アイラ");
        assert_eq!(link.filename(), "アイラ");
        assert!(link.heading.is_none());
        assert!(!link.is_block_reference());
    }

    #[test]
    fn test_heading_and_display() {
        let link = parse_link("[[アイラ#出自|彼女の生まれ]]").unwrap();
        assert_eq!(link.target, "アイラ");
        assert_eq!(link.heading.as_deref(), Some("出自"));
        assert_eq!(link.display_text(), "彼女の生まれ");
    }

    #[test]
    fn test_block_reference() {
        let link = parse_link("[[notes/ep010#^abc123]]").unwrap();
        assert_eq!(link.block_id.as_deref(), Some("abc123"));
        assert!(link.heading.is_none());
        assert!(link.is_block_reference());
    }

    #[test]
    fn test_invalid_links() {
        assert!(parse_link("[[]]").is_none());
        assert!(parse_link("[[   ]]").is_none());
        assert!(parse_link("[[#heading]]").is_none());
        assert!(parse_link("not a link").is_none());
    }

    #[test]
    fn test_round_trip() {
        for text in [
            "[[a]]",
            "[[dir/a|Alias]]",
            "[[a#Heading]]",
            "[[a#^block]]",
            "[[a#^block|shown]]",
            "[[a#Heading|shown]]",
        ] {
            assert_eq!(parse_link(text).unwrap().to_markdown(), text);
        }
    }

    #[test]
    fn test_extract_links() {
        let content = "See [[アイラ]] and [[王都#城|the castle]].\nAlso [[x#^b1]].";
        let links = extract_links(content);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].target, "アイラ");
        assert_eq!(links[1].display.as_deref(), Some("the castle"));
        assert_eq!(links[2].block_id.as_deref(), Some("b1"));
    }

    #[test]
    fn test_builder_renders() {
        let link = ObsidianLink::new("a").with_heading("h").with_display("d");
        assert_eq!(link.to_string(), "[[a#h|d]]");
    }
}
