//! Text statistics over drafts, used to compare a draft against a style guide.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Default dialogue bracket pairs (Japanese quotation marks).
pub const DEFAULT_DIALOGUE_BRACKETS: [(char, char); 2] = [('「', '」'), ('『', '』')];

fn sentence_end_regex() -> &'static Regex {
    static SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    SENTENCE_END.get_or_init(|| Regex::new(r"[。！？!?]+").expect("sentence pattern is valid"))
}

/// Mean length of sentences in characters; 0 for empty text.
pub fn avg_sentence_length(text: &str) -> f64 {
    let lengths: Vec<usize> = sentence_end_regex()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.chars().count())
        .collect();

    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

/// Share of characters inside dialogue brackets; 0 for empty text.
pub fn dialogue_ratio(text: &str, brackets: &[(char, char)]) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }

    let inside: usize = brackets
        .iter()
        .filter_map(|(open, close)| {
            let pattern = format!(
                "(?s){}(.*?){}",
                regex::escape(&open.to_string()),
                regex::escape(&close.to_string())
            );
            Regex::new(&pattern).ok()
        })
        .map(|re| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().chars().count())
                .sum::<usize>()
        })
        .sum();

    inside as f64 / total as f64
}

/// Split into whitespace-delimited words when the text has ASCII spaces,
/// otherwise into single characters.
///
/// Line breaks and full-width indents alone do not make a text spaced; they
/// are skipped in character mode.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.contains(' ') {
        text.split_whitespace().map(str::to_string).collect()
    } else {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    }
}

/// Type-token ratio; 0 for empty text.
pub fn ttr(text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: std::collections::HashSet<&String> = tokens.iter().collect();
    unique.len() as f64 / tokens.len() as f64
}

/// The `top_n` most frequent tokens; ties keep first-seen order.
pub fn frequent_words(text: &str, top_n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for token in tokenize(text) {
        match positions.get(&token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token.clone(), counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);
    counts
}

/// All text statistics for a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub avg_sentence_length: f64,
    pub dialogue_ratio: f64,
    pub ttr: f64,
    pub frequent_words: Vec<(String, usize)>,
}

impl TextStats {
    /// Statistics keyed by name.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Compute every statistic with default parameters.
pub fn compute_text_stats(text: &str) -> TextStats {
    TextStats {
        avg_sentence_length: avg_sentence_length(text),
        dialogue_ratio: dialogue_ratio(text, &DEFAULT_DIALOGUE_BRACKETS),
        ttr: ttr(text),
        frequent_words: frequent_words(text, 20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg_sentence_length() {
        assert_eq!(avg_sentence_length(""), 0.0);
        assert_eq!(avg_sentence_length("あいう。えお！"), 2.5);
        assert_eq!(avg_sentence_length("Hi! Yes?!"), 2.5);
        assert_eq!(avg_sentence_length("。。。"), 0.0);
    }

    #[test]
    fn test_dialogue_ratio() {
        assert_eq!(dialogue_ratio("", &DEFAULT_DIALOGUE_BRACKETS), 0.0);
        // 12 characters, 2 inside 「」 and 2 inside 『』.
        let text = "彼は「はい」と『いえ』と";
        let ratio = dialogue_ratio(text, &DEFAULT_DIALOGUE_BRACKETS);
        assert!((ratio - 4.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_dialogue_non_greedy() {
        let ratio = dialogue_ratio("「あ」い「う」", &[('「', '」')]);
        assert!((ratio - 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_tokenize_modes() {
        assert_eq!(tokenize("a b  c"), vec!["a", "b", "c"]);
        assert_eq!(tokenize("あいう"), vec!["あ", "い", "う"]);
    }

    #[test]
    fn test_tokenize_unspaced_multiline() {
        assert_eq!(tokenize("あいう\nあいう").len(), 6);
        assert_eq!(
            tokenize("\u{3000}彼は笑った。"),
            vec!["彼", "は", "笑", "っ", "た", "。"]
        );

        let prose = "\u{3000}彼は笑った。\n\u{3000}彼は泣いた。";
        assert_eq!(ttr("あいう\nあいう"), 0.5);
        assert!((ttr(prose) - 8.0 / 12.0).abs() < 1e-9);
        assert_eq!(
            frequent_words(prose, 2),
            vec![("彼".to_string(), 2), ("は".to_string(), 2)]
        );
    }

    #[test]
    fn test_ttr() {
        assert_eq!(ttr(""), 0.0);
        assert_eq!(ttr("a a b b"), 0.5);
        assert_eq!(ttr("あいあい"), 0.5);
    }

    #[test]
    fn test_frequent_words_ties_keep_order() {
        let words = frequent_words("b a b a c", 2);
        assert_eq!(words, vec![("b".to_string(), 2), ("a".to_string(), 2)]);
        assert!(frequent_words("", 5).is_empty());
    }

    #[test]
    fn test_compute_text_stats() {
        let stats = compute_text_stats("「行こう」と彼は言った。");
        assert!(stats.avg_sentence_length > 0.0);
        assert!(stats.dialogue_ratio > 0.0);
        let map = stats.to_map();
        for key in ["avg_sentence_length", "dialogue_ratio", "ttr", "frequent_words"] {
            assert!(map.contains_key(key));
        }
    }
}
