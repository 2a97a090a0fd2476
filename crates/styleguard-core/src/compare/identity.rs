//! Identity matching: every template rule is looked up in the document's
//! rule list by id and scored field by field.

use super::result::{share_score, MatchStrategy, RuleComparison};
use super::settings::ComparisonSettings;
use crate::model::{
    Difference, FontRule, FormatIssue, IssueKind, PageRule, ParagraphRule, RuleKind, TableRule,
};
use crate::types::Severity;
use serde::Serialize;
use serde_json::{Map, Value};

/// One checked field of a rule pair.
#[derive(Debug, Clone)]
pub(crate) struct FieldCheck {
    pub field: &'static str,
    pub current: Value,
    pub expected: Value,
    pub matches: bool,
}

impl FieldCheck {
    fn difference(&self) -> Difference {
        Difference::new(self.field, self.current.clone(), self.expected.clone())
    }
}

pub(crate) fn check_number(
    field: &'static str,
    current: Option<f64>,
    expected: Option<f64>,
    settings: &ComparisonSettings,
) -> Option<FieldCheck> {
    expected?;
    Some(FieldCheck {
        field,
        current: current.into(),
        expected: expected.into(),
        matches: settings.numbers_match(current, expected),
    })
}

/// Case-insensitive string check, skipped when the template leaves it unset.
pub(crate) fn check_keyword(
    field: &'static str,
    current: Option<&str>,
    expected: Option<&str>,
) -> Option<FieldCheck> {
    let wanted = expected?;
    Some(FieldCheck {
        field,
        current: current.into(),
        expected: wanted.into(),
        matches: current.is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
    })
}

/// A rule type that can be paired by id.
pub(crate) trait IdentityRule: Serialize {
    const KIND: RuleKind;

    fn id(&self) -> &str;

    /// Checks of the fields `self` (the template rule) sets.
    fn field_checks(&self, document: &Self, settings: &ComparisonSettings) -> Vec<FieldCheck>;
}

impl IdentityRule for FontRule {
    const KIND: RuleKind = RuleKind::Font;

    fn id(&self) -> &str {
        &self.id
    }

    fn field_checks(&self, document: &Self, settings: &ComparisonSettings) -> Vec<FieldCheck> {
        let name = FieldCheck {
            field: "name",
            current: document.name.as_str().into(),
            expected: self.name.as_str().into(),
            matches: document.name == self.name,
        };
        std::iter::once(name)
            .chain(check_number("size", document.size, self.size, settings))
            .collect()
    }
}

impl IdentityRule for ParagraphRule {
    const KIND: RuleKind = RuleKind::Paragraph;

    fn id(&self) -> &str {
        &self.id
    }

    fn field_checks(&self, document: &Self, settings: &ComparisonSettings) -> Vec<FieldCheck> {
        [
            check_keyword(
                "alignment",
                document.alignment.as_deref(),
                self.alignment.as_deref(),
            ),
            check_number(
                "line_spacing",
                document.line_spacing,
                self.line_spacing,
                settings,
            ),
            check_number(
                "space_before",
                document.space_before,
                self.space_before,
                settings,
            ),
            check_number("space_after", document.space_after, self.space_after, settings),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl IdentityRule for TableRule {
    const KIND: RuleKind = RuleKind::Table;

    fn id(&self) -> &str {
        &self.id
    }

    fn field_checks(&self, document: &Self, settings: &ComparisonSettings) -> Vec<FieldCheck> {
        [
            check_number("width", document.width, self.width, settings),
            check_keyword(
                "alignment",
                document.alignment.as_deref(),
                self.alignment.as_deref(),
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl IdentityRule for PageRule {
    const KIND: RuleKind = RuleKind::Page;

    fn id(&self) -> &str {
        &self.id
    }

    fn field_checks(&self, document: &Self, settings: &ComparisonSettings) -> Vec<FieldCheck> {
        [
            check_number("width", document.width, self.width, settings),
            check_number("height", document.height, self.height, settings),
            check_number("margin_top", document.margin_top, self.margin_top, settings),
            check_number(
                "margin_bottom",
                document.margin_bottom,
                self.margin_bottom,
                settings,
            ),
            check_number("margin_left", document.margin_left, self.margin_left, settings),
            check_number(
                "margin_right",
                document.margin_right,
                self.margin_right,
                settings,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn rule_location(kind: RuleKind, id: &str) -> String {
    let label = match kind {
        RuleKind::Font => "Font",
        RuleKind::Paragraph => "Paragraph",
        RuleKind::Table => "Table",
        RuleKind::Page => "Page",
    };
    format!("{} rule {}", label, id)
}

/// Compare two rule lists of one kind. The result follows template order.
pub(crate) fn compare_rules<R: IdentityRule>(
    document: &[R],
    template: &[R],
    settings: &ComparisonSettings,
) -> Vec<RuleComparison> {
    template
        .iter()
        .map(|template_rule| {
            match document.iter().find(|r| r.id() == template_rule.id()) {
                Some(document_rule) => compare_pair(document_rule, template_rule, settings),
                None => missing_rule(template_rule),
            }
        })
        .collect()
}

fn compare_pair<R: IdentityRule>(
    document: &R,
    template: &R,
    settings: &ComparisonSettings,
) -> RuleComparison {
    let checks = template.field_checks(document, settings);
    let matched = checks.iter().filter(|c| c.matches).count();
    let differences: Vec<Difference> = checks
        .iter()
        .filter(|c| !c.matches)
        .map(FieldCheck::difference)
        .collect();

    let mut issues = Vec::new();
    if !differences.is_empty() {
        issues.push(mismatch_issue(R::KIND, template.id(), &differences));
    }

    RuleComparison {
        rule_id: template.id().to_string(),
        kind: R::KIND,
        strategy: MatchStrategy::Identity,
        compliant: differences.is_empty(),
        score: share_score(matched, checks.len()),
        differences,
        issues,
    }
}

fn mismatch_issue(kind: RuleKind, rule_id: &str, differences: &[Difference]) -> FormatIssue {
    let fields: Vec<&str> = differences.iter().map(|d| d.field.as_str()).collect();
    let (current, expected) = snapshots(differences);

    let mut issue = FormatIssue::new(
        format!("{}_mismatch_{}", kind, rule_id),
        IssueKind::RuleMismatch {
            kind,
            rule_id: rule_id.to_string(),
            differences: differences.to_vec(),
        },
        Severity::Medium,
        rule_location(kind, rule_id),
        format!("{} rule '{}' differs in {}", kind, rule_id, fields.join(", ")),
    )
    .with_current(current)
    .with_expected(expected);

    for difference in differences {
        issue = issue.with_suggestion(format!("Change {}", difference.describe()));
    }
    issue
}

fn missing_rule<R: IdentityRule>(template: &R) -> RuleComparison {
    let kind = R::KIND;
    let expected = serde_json::to_value(template).unwrap_or(Value::Null);

    let issue = FormatIssue::new(
        format!("{}_missing_{}", kind, template.id()),
        IssueKind::RuleMissing {
            kind,
            rule_id: template.id().to_string(),
        },
        Severity::High,
        rule_location(kind, template.id()),
        format!(
            "Template {} rule '{}' has no counterpart in the document",
            kind,
            template.id()
        ),
    )
    .with_expected(expected)
    .with_suggestion(format!(
        "Apply the template's {} rule '{}'",
        kind,
        template.id()
    ));

    RuleComparison {
        rule_id: template.id().to_string(),
        kind,
        strategy: MatchStrategy::Identity,
        compliant: false,
        score: 0.0,
        differences: Vec::new(),
        issues: vec![issue],
    }
}

/// `{field: current}` and `{field: expected}` objects for an issue.
pub(crate) fn snapshots(differences: &[Difference]) -> (Value, Value) {
    let mut current = Map::new();
    let mut expected = Map::new();
    for d in differences {
        current.insert(d.field.clone(), d.current.clone());
        expected.insert(d.field.clone(), d.expected.clone());
    }
    (Value::Object(current), Value::Object(expected))
}
