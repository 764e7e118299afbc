//! Extraction of structured results from raw LLM output.
//!
//! Agents answer with prose around a fenced ```` ```yaml ```` block; the first
//! such block is parsed and validated against the expected schema.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

use super::models::{QualityResult, ReviewResult};
use crate::error::{ControlError, ControlResult};

fn yaml_block_regex() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| Regex::new(r"(?s)```yaml[^\n]*\n(.*?)```").expect("block pattern is valid"))
}

/// Body of the first fenced YAML block.
pub fn extract_yaml_block(text: &str) -> ControlResult<&str> {
    yaml_block_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ControlError::parse("no ```yaml block found in output"))
}

/// Parse the first YAML block as a mapping.
pub fn parse_yaml_mapping(text: &str) -> ControlResult<Mapping> {
    let block = extract_yaml_block(text)?;
    let value: Value = serde_yaml::from_str(block)
        .map_err(|e| ControlError::parse(format!("malformed YAML: {}", e)))?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ControlError::validation("YAML root must be a mapping")),
    }
}

fn require_keys(mapping: &Mapping, keys: &[&str]) -> ControlResult<()> {
    for key in keys {
        if !mapping.contains_key(*key) {
            return Err(ControlError::validation(format!(
                "missing required field '{}'",
                key
            )));
        }
    }
    Ok(())
}

fn from_mapping<T: DeserializeOwned>(mapping: Mapping) -> ControlResult<T> {
    serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|e| ControlError::validation(e.to_string()))
}

/// Parse a reviewer agent's output.
pub fn parse_review_output(text: &str) -> ControlResult<ReviewResult> {
    let mapping = parse_yaml_mapping(text)?;
    require_keys(&mapping, &["result"])?;
    from_mapping(mapping)
}

/// Parse a quality agent's output.
pub fn parse_quality_output(text: &str) -> ControlResult<QualityResult> {
    let mapping = parse_yaml_mapping(text)?;
    require_keys(&mapping, &["scores", "assessment"])?;
    let result: QualityResult = from_mapping(mapping)?;
    result.validate()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{Assessment, IssueSeverity, IssueType, ReviewIssue, ReviewStatus};

    const REVIEW: &str = r#"I checked the draft.

```yaml
result: warning
issues:
  - type: subtlety
    severity: warning
    location: 第3段落
    detail: 指輪への言及が直接的すぎる
    suggestion: 光の反射だけを描写する
```

Let me know if you need more."#;

    const QUALITY: &str = r#"```yaml
scores:
  coherence: 0.9
  character_consistency: 0.8
  style_adherence: 0.85
  pacing: 0.7
  dialogue_quality: 0.75
  description_quality: 0.8
  foreshadowing_handling: 0.9
  readability: 0.95
assessment: good
recommendations:
  - 会話のテンポを上げる
```"#;

    #[test]
    fn test_parse_review() {
        let result = parse_review_output(REVIEW).unwrap();
        assert_eq!(result.status, ReviewStatus::Warning);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].issue_type, IssueType::Subtlety);
        assert_eq!(result.issues[0].location.as_deref(), Some("第3段落"));
    }

    #[test]
    fn test_parse_review_without_issues() {
        let result = parse_review_output("```yaml\nresult: approved\n```").unwrap();
        assert!(result.is_approved());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_missing_block() {
        let err = parse_review_output("result: approved").unwrap_err();
        assert!(matches!(err, ControlError::Parse(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse_review_output("```yaml\nresult: [unclosed\n```").unwrap_err();
        assert!(matches!(err, ControlError::Parse(_)));
    }

    #[test]
    fn test_non_mapping_root() {
        let err = parse_review_output("```yaml\n- a\n- b\n```").unwrap_err();
        assert!(matches!(err, ControlError::Validation(_)));
    }

    #[test]
    fn test_missing_result() {
        let err = parse_review_output("```yaml\nissues: []\n```").unwrap_err();
        assert!(matches!(err, ControlError::Validation(_)));
    }

    #[test]
    fn test_unknown_enum_value() {
        let err = parse_review_output("```yaml\nresult: maybe\n```").unwrap_err();
        assert!(matches!(err, ControlError::Validation(_)));

        let bad_severity = "```yaml\nresult: rejected\nissues:\n  - type: other\n    severity: fatal\n    detail: x\n```";
        assert!(matches!(
            parse_review_output(bad_severity),
            Err(ControlError::Validation(_))
        ));
    }

    #[test]
    fn test_only_first_block_used() {
        let text = "```yaml\nresult: approved\n```\n```yaml\nresult: rejected\n```";
        assert!(parse_review_output(text).unwrap().is_approved());
    }

    #[test]
    fn test_review_round_trip() {
        let original = ReviewResult::rejected(vec![ReviewIssue::new(
            IssueType::ForbiddenKeyword,
            IssueSeverity::Critical,
            "Forbidden keyword '王族' found 2 time(s)",
        )
        .with_location("...王族として...")
        .with_suggestion("Avoid the keyword '王族'")]);

        let envelope = format!("Review:\n{}\n", original.to_yaml_block().unwrap());
        assert_eq!(parse_review_output(&envelope).unwrap(), original);
    }

    #[test]
    fn test_parse_quality() {
        let result = parse_quality_output(QUALITY).unwrap();
        assert_eq!(result.assessment, Assessment::Good);
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.issues.is_empty());
        assert_eq!(result.derived_assessment().unwrap(), Assessment::Good);
    }

    #[test]
    fn test_quality_missing_fields() {
        let no_assessment = "```yaml\nscores:\n  coherence: 0.5\n```";
        assert!(matches!(
            parse_quality_output(no_assessment),
            Err(ControlError::Validation(_))
        ));
    }

    #[test]
    fn test_quality_score_out_of_range() {
        let text = QUALITY.replace("pacing: 0.7", "pacing: 1.7");
        let err = parse_quality_output(&text).unwrap_err();
        assert!(matches!(err, ControlError::Validation(_)));
    }
}
