use super::result::{ComparisonOutcome, ContentComparison, FormatComparison, StyleComparison};
use crate::error::Result;
use crate::model::FormatIssue;
use crate::types::{Priority, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ApplySuggestedChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub issue_id: String,
    pub priority: Priority,
    pub description: String,
    pub actions: Vec<RecommendationAction>,
}

impl Recommendation {
    pub fn for_issue(issue: &FormatIssue) -> Self {
        Self {
            issue_id: issue.id.clone(),
            priority: issue.severity.priority(),
            description: issue.description.clone(),
            actions: vec![RecommendationAction {
                action_type: ActionType::ApplySuggestedChanges,
                suggestions: issue.suggestions.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_issues: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub compliant_rules: usize,
    pub non_compliant_rules: usize,
    pub total_rules: usize,
}

impl ReportSummary {
    fn build(issues: &[FormatIssue], format: &FormatComparison) -> Self {
        let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
        let total_rules = format.total_rules();
        let compliant_rules = format.compliant_rules();

        Self {
            total_issues: issues.len(),
            critical: count(Severity::Critical),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            compliant_rules,
            non_compliant_rules: total_rules - compliant_rules,
            total_rules,
        }
    }
}

/// Final result of a check, serialized as-is for reporting layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub document_path: String,
    pub template_path: String,
    pub overall_score: f64,
    pub compliance_rate: f64,
    pub issues: Vec<FormatIssue>,
    pub format_comparison: FormatComparison,
    pub content_comparison: ContentComparison,
    pub style_comparison: StyleComparison,
    pub recommendations: Vec<Recommendation>,
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ComparisonReport {
    pub fn from_outcome(
        document_path: impl Into<String>,
        template_path: impl Into<String>,
        outcome: ComparisonOutcome,
    ) -> Self {
        let overall_score = outcome.overall_score();
        let recommendations = outcome.issues.iter().map(Recommendation::for_issue).collect();
        let summary = ReportSummary::build(&outcome.issues, &outcome.format);

        Self {
            document_path: document_path.into(),
            template_path: template_path.into(),
            overall_score,
            compliance_rate: outcome.format.compliance_rate,
            issues: outcome.issues,
            format_comparison: outcome.format,
            content_comparison: outcome.content,
            style_comparison: outcome.style,
            recommendations,
            summary,
            annotated_path: None,
            warnings: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::FormatComparer;
    use crate::model::{FontRule, FormatRules, IssueKind, RuleKind};

    fn report() -> ComparisonReport {
        let template = FormatRules {
            font_rules: vec![FontRule::new("font1", "黑体", 12.0)],
            ..Default::default()
        };
        let outcome =
            FormatComparer::compare(&FormatRules::default(), &template, None, None, None).unwrap();
        ComparisonReport::from_outcome("doc.docx", "template.docx", outcome)
    }

    #[test]
    fn json_report_reads_back_with_issue_kinds() {
        let json = report().to_json().unwrap();
        let back: ComparisonReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.summary.total_issues, 1);
        assert_eq!(
            back.issues[0].kind,
            IssueKind::RuleMissing {
                kind: RuleKind::Font,
                rule_id: "font1".into()
            }
        );
        assert_eq!(back.recommendations[0].priority, Priority::High);
    }
}
