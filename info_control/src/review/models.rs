//! Structured results of draft review and quality assessment.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Overall verdict of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Warning,
    Rejected,
}

/// What a review issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    ForbiddenKeyword,
    Similarity,
    Subtlety,
    Continuity,
    Other,
}

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Info,
}

/// A single problem found in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,

    pub severity: IssueSeverity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ReviewIssue {
    pub fn new(issue_type: IssueType, severity: IssueSeverity, detail: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            location: None,
            detail: detail.into(),
            suggestion: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of reviewing a draft for information leaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(rename = "result")]
    pub status: ReviewStatus,

    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
}

impl ReviewResult {
    pub fn approved() -> Self {
        Self {
            status: ReviewStatus::Approved,
            issues: Vec::new(),
        }
    }

    pub fn rejected(issues: Vec<ReviewIssue>) -> Self {
        Self {
            status: ReviewStatus::Rejected,
            issues,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    /// Number of issues with the given severity.
    pub fn count_severity(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Render as the fenced YAML envelope the reviewer agent emits.
    pub fn to_yaml_block(&self) -> ControlResult<String> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ControlError::parse(format!("failed to serialize review: {}", e)))?;
        Ok(format!("```yaml\n{}```", yaml))
    }
}

/// Per-aspect quality scores, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub coherence: f64,
    pub character_consistency: f64,
    pub style_adherence: f64,
    pub pacing: f64,
    pub dialogue_quality: f64,
    pub description_quality: f64,
    pub foreshadowing_handling: f64,
    pub readability: f64,
}

impl QualityScores {
    /// Scores paired with their names.
    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("coherence", self.coherence),
            ("character_consistency", self.character_consistency),
            ("style_adherence", self.style_adherence),
            ("pacing", self.pacing),
            ("dialogue_quality", self.dialogue_quality),
            ("description_quality", self.description_quality),
            ("foreshadowing_handling", self.foreshadowing_handling),
            ("readability", self.readability),
        ]
    }

    /// Check every score is within `[0.0, 1.0]`.
    pub fn validate(&self) -> ControlResult<()> {
        for (name, score) in self.named() {
            if !(0.0..=1.0).contains(&score) {
                return Err(ControlError::validation(format!(
                    "score '{}' must be between 0.0 and 1.0, got {}",
                    name, score
                )));
            }
        }
        Ok(())
    }

    /// Mean of all scores.
    pub fn overall(&self) -> f64 {
        let named = self.named();
        named.iter().map(|(_, s)| s).sum::<f64>() / named.len() as f64
    }
}

/// Qualitative grade of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
}

impl Assessment {
    /// Grade a score; lower bounds are inclusive.
    pub fn from_score(score: f64) -> ControlResult<Self> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ControlError::validation(format!(
                "score must be between 0.0 and 1.0, got {}",
                score
            )));
        }
        Ok(if score >= 0.85 {
            Assessment::Excellent
        } else if score >= 0.70 {
            Assessment::Good
        } else if score >= 0.50 {
            Assessment::Acceptable
        } else {
            Assessment::NeedsImprovement
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Excellent => "excellent",
            Assessment::Good => "good",
            Assessment::Acceptable => "acceptable",
            Assessment::NeedsImprovement => "needs_improvement",
        }
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grade a score (see [`Assessment::from_score`]).
pub fn get_assessment(score: f64) -> ControlResult<Assessment> {
    Assessment::from_score(score)
}

/// A quality finding; categories are free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub severity: IssueSeverity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Result of a quality assessment of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub scores: QualityScores,
    pub assessment: Assessment,

    #[serde(default)]
    pub issues: Vec<QualityIssue>,

    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl QualityResult {
    /// Check every score is within range.
    pub fn validate(&self) -> ControlResult<()> {
        self.scores.validate()
    }

    /// Assessment derived from the mean score.
    pub fn derived_assessment(&self) -> ControlResult<Assessment> {
        Assessment::from_score(self.scores.overall())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(value: f64) -> QualityScores {
        QualityScores {
            coherence: value,
            character_consistency: value,
            style_adherence: value,
            pacing: value,
            dialogue_quality: value,
            description_quality: value,
            foreshadowing_handling: value,
            readability: value,
        }
    }

    #[test]
    fn test_assessment_thresholds() {
        let cases = [
            (0.0, Assessment::NeedsImprovement),
            (0.49, Assessment::NeedsImprovement),
            (0.5, Assessment::Acceptable),
            (0.7, Assessment::Good),
            (0.85, Assessment::Excellent),
            (1.0, Assessment::Excellent),
        ];
        for (score, expected) in cases {
            assert_eq!(get_assessment(score).unwrap(), expected, "score {}", score);
        }
        assert_eq!(get_assessment(0.70).unwrap().as_str(), "good");
    }

    #[test]
    fn test_assessment_out_of_range() {
        assert!(get_assessment(-0.01).is_err());
        assert!(get_assessment(1.01).is_err());
        assert!(get_assessment(f64::NAN).is_err());
    }

    #[test]
    fn test_scores_validation() {
        assert!(scores(0.5).validate().is_ok());
        let mut bad = scores(0.5);
        bad.pacing = 1.5;
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("pacing"));
    }

    #[test]
    fn test_overall_score() {
        let mut s = scores(0.5);
        s.coherence = 1.0;
        s.readability = 0.0;
        assert!((s.overall() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_review_result_helpers() {
        let result = ReviewResult::rejected(vec![
            ReviewIssue::new(IssueType::ForbiddenKeyword, IssueSeverity::Critical, "a"),
            ReviewIssue::new(IssueType::Other, IssueSeverity::Info, "b"),
        ]);
        assert!(!result.is_approved());
        assert_eq!(result.count_severity(IssueSeverity::Critical), 1);
        assert!(ReviewResult::approved().is_approved());
    }

    #[test]
    fn test_review_yaml_shape() {
        let result = ReviewResult::rejected(vec![ReviewIssue::new(
            IssueType::ForbiddenKeyword,
            IssueSeverity::Critical,
            "detail",
        )]);
        let block = result.to_yaml_block().unwrap();
        assert!(block.starts_with("```yaml\n"));
        assert!(block.contains("result: rejected"));
        assert!(block.contains("type: forbidden_keyword"));
        assert!(!block.contains("location"));
    }
}
