//! Expression Filter - exact-substring detection of forbidden keywords in drafts.
//!
//! Matching is case-sensitive and works on Unicode scalar values, so reported
//! positions are character offsets rather than byte offsets. Overlapping
//! occurrences are all reported: after a match at `pos` the scan resumes at
//! `pos + 1`.

use serde::{Deserialize, Serialize};

/// Default number of characters of context on each side of a match.
pub const DEFAULT_CONTEXT_CHARS: usize = 20;

/// A forbidden keyword found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordViolation {
    pub keyword: String,

    /// Character offsets of every occurrence, ascending.
    pub positions: Vec<usize>,

    /// Excerpt around the first occurrence.
    pub context: String,
}

impl KeywordViolation {
    pub fn occurrences(&self) -> usize {
        self.positions.len()
    }
}

/// Outcome of a safety check over a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyCheckResult {
    pub is_safe: bool,
    pub violations: Vec<KeywordViolation>,
    pub summary: String,
}

/// Find every occurrence of every non-empty keyword in `text`.
///
/// Violations are returned in keyword order; keywords that do not occur are
/// omitted.
pub fn check_forbidden_keywords<S: AsRef<str>>(
    text: Option<&str>,
    keywords: &[S],
    context_chars: usize,
) -> Vec<KeywordViolation> {
    let Some(text) = text else {
        return Vec::new();
    };
    let chars: Vec<char> = text.chars().collect();

    keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|keyword| !keyword.is_empty())
        .filter_map(|keyword| {
            let needle: Vec<char> = keyword.chars().collect();
            let positions = find_all(&chars, &needle);
            let first = *positions.first()?;
            Some(KeywordViolation {
                keyword: keyword.to_string(),
                context: extract_context(&chars, first, needle.len(), context_chars),
                positions,
            })
        })
        .collect()
}

/// Check a text and summarise the result.
pub fn check_text_safety<S: AsRef<str>>(text: Option<&str>, keywords: &[S]) -> SafetyCheckResult {
    let violations = check_forbidden_keywords(text, keywords, DEFAULT_CONTEXT_CHARS);
    let summary = if violations.is_empty() {
        "No violations found".to_string()
    } else {
        let names: Vec<&str> = violations.iter().map(|v| v.keyword.as_str()).collect();
        format!(
            "Found {} violation(s): {}",
            violations.len(),
            names.join(", ")
        )
    };

    SafetyCheckResult {
        is_safe: violations.is_empty(),
        violations,
        summary,
    }
}

/// Start offsets of all (possibly overlapping) occurrences of `needle`.
fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(pos, _)| pos)
        .collect()
}

/// Excerpt `[pos - width, pos + len + width)`, with `...` marking truncation.
fn extract_context(chars: &[char], pos: usize, len: usize, width: usize) -> String {
    let start = pos.saturating_sub(width);
    let end = (pos + len + width).min(chars.len());

    let mut context = String::new();
    if start > 0 {
        context.push_str("...");
    }
    context.extend(&chars[start..end]);
    if end < chars.len() {
        context.push_str("...");
    }
    context
}
