//! Algorithmic review of drafts and the human fallback after repeated failures.

use serde::{Deserialize, Serialize};

use super::models::{IssueSeverity, IssueType, ReviewIssue, ReviewResult};
use crate::expression_filter::{check_forbidden_keywords, KeywordViolation, DEFAULT_CONTEXT_CHARS};

/// Failed reviews allowed before a scene goes to a human.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Status string of a human fallback report.
pub const HUMAN_FALLBACK_STATUS: &str = "human_fallback";

fn violation_issue(violation: &KeywordViolation) -> ReviewIssue {
    ReviewIssue::new(
        IssueType::ForbiddenKeyword,
        IssueSeverity::Critical,
        format!(
            "Forbidden keyword '{}' found {} time(s)",
            violation.keyword,
            violation.occurrences()
        ),
    )
    .with_location(violation.context.clone())
    .with_suggestion(format!("Avoid the keyword '{}'", violation.keyword))
}

/// Review a draft against the forbidden keyword list.
///
/// Any occurrence rejects the draft, with one critical issue per keyword.
pub fn run_algorithmic_review<S: AsRef<str>>(draft: &str, forbidden: &[S]) -> ReviewResult {
    review_with_context(draft, forbidden, DEFAULT_CONTEXT_CHARS)
}

/// [`run_algorithmic_review`] with a custom context width.
pub fn review_with_context<S: AsRef<str>>(
    draft: &str,
    forbidden: &[S],
    context_chars: usize,
) -> ReviewResult {
    let violations = check_forbidden_keywords(Some(draft), forbidden, context_chars);
    if violations.is_empty() {
        return ReviewResult::approved();
    }

    tracing::info!(
        violations = violations.len(),
        keywords = ?violations.iter().map(|v| v.keyword.as_str()).collect::<Vec<_>>(),
        "Draft rejected by algorithmic review"
    );
    ReviewResult::rejected(violations.iter().map(violation_issue).collect())
}

/// Whether the retry budget is exhausted.
pub fn should_fallback(retry_count: u32, max_retries: u32) -> bool {
    retry_count >= max_retries
}

/// Report handed to a human when automatic retries are exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackReport {
    pub status: String,
    pub message: String,
    pub retry_count: u32,
    pub last_issues: Vec<ReviewIssue>,
}

impl FallbackReport {
    /// The report as a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status,
            "message": self.message,
            "retry_count": self.retry_count,
            "last_issues": self
                .last_issues
                .iter()
                .filter_map(|issue| serde_json::to_value(issue).ok())
                .collect::<Vec<_>>(),
        })
    }
}

/// Build the human fallback report.
pub fn format_fallback_report(retry_count: u32, last_result: Option<&ReviewResult>) -> FallbackReport {
    let last_issues = last_result.map(|r| r.issues.clone()).unwrap_or_default();
    tracing::warn!(
        retry_count,
        issues = last_issues.len(),
        "Review retries exhausted, falling back to human review"
    );

    FallbackReport {
        status: HUMAN_FALLBACK_STATUS.to_string(),
        message: format!(
            "Automatic review failed {} time(s). Please revise the draft manually.",
            retry_count
        ),
        retry_count,
        last_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewStatus;

    #[test]
    fn test_clean_draft_approved() {
        let result = run_algorithmic_review("穏やかな朝だった。", &["王族"]);
        assert_eq!(result.status, ReviewStatus::Approved);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_violations_rejected() {
        let result = run_algorithmic_review("王族は王族らしく、禁呪を使う。", &["王族", "禁呪", "竜"]);
        assert_eq!(result.status, ReviewStatus::Rejected);
        assert_eq!(result.issues.len(), 2);

        let first = &result.issues[0];
        assert_eq!(first.issue_type, IssueType::ForbiddenKeyword);
        assert_eq!(first.severity, IssueSeverity::Critical);
        assert!(first.detail.contains("王族"));
        assert!(first.detail.contains("2 time(s)"));
        assert!(first.location.as_deref().unwrap().contains("王族"));
        assert_eq!(first.suggestion.as_deref(), Some("Avoid the keyword '王族'"));
    }

    #[test]
    fn test_should_fallback() {
        assert!(!should_fallback(0, DEFAULT_MAX_RETRIES));
        assert!(!should_fallback(2, 3));
        assert!(should_fallback(3, 3));
        assert!(should_fallback(4, 3));
    }

    #[test]
    fn test_fallback_report() {
        let last = run_algorithmic_review("王族", &["王族"]);
        let report = format_fallback_report(3, Some(&last));
        assert_eq!(report.status, "human_fallback");
        assert_eq!(report.retry_count, 3);
        assert_eq!(report.last_issues.len(), 1);

        let value = report.to_value();
        assert_eq!(value["status"], "human_fallback");
        assert_eq!(value["retry_count"], 3);
        assert_eq!(value["last_issues"][0]["type"], "forbidden_keyword");
        assert!(value["message"].as_str().unwrap().contains('3'));
    }

    #[test]
    fn test_fallback_without_result() {
        let report = format_fallback_report(5, None);
        assert!(report.last_issues.is_empty());
        assert_eq!(report.to_value()["last_issues"], serde_json::json!([]));
    }
}
