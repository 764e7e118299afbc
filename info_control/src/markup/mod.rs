//! Markdown markup understood by the information control layer.
//!
//! - **visibility comments**: `<!-- ai_visibility: N -->` markers that set the
//!   level of the enclosing section
//! - **links**: Obsidian `[[target#anchor|display]]` references

mod link;
mod visibility_comment;

pub use link::*;
pub use visibility_comment::*;

use regex::Regex;
use std::sync::OnceLock;

/// Markdown ATX header (`# Title` .. `###### Title`).
pub(crate) fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^#{1,6}\s+(.+)$").expect("header pattern is valid"))
}

/// Section name if `line` is a markdown header with a non-blank title.
pub(crate) fn header_name(line: &str) -> Option<String> {
    header_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
