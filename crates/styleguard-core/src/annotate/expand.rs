//! Turning issues into comment records.

use super::record::{Anchor, CommentIdCounter, CommentRecord};
use crate::model::{display_value, paragraph_location, table_location, Difference, FormatIssue, IssueKind};

/// Expand one issue into its comment records, drawing ids from `ids`.
pub fn expand_issue(issue: &FormatIssue, ids: &mut CommentIdCounter) -> Vec<CommentRecord> {
    let suggestion = issue.suggestions.join("; ");
    let current = display_value_or_empty(&issue.current);
    let expected = display_value_or_empty(&issue.expected);

    let mut single = |anchor: Anchor, location: String, current: String, expected: String| {
        vec![CommentRecord {
            id: ids.next_id(),
            anchor,
            location,
            problem: issue.description.clone(),
            current_format: current,
            expected_format: expected,
            suggestion: suggestion.clone(),
        }]
    };

    match &issue.kind {
        IssueKind::RuleMissing { .. } => {
            single(Anchor::Paragraph(0), issue.location.clone(), String::new(), expected)
        }
        IssueKind::RuleMismatch { differences, .. } => {
            let (current, expected) = sides(differences);
            single(Anchor::Paragraph(0), issue.location.clone(), current, expected)
        }
        IssueKind::ParagraphAlignment {
            paragraph,
            current,
            expected,
        } => single(
            Anchor::Paragraph(*paragraph),
            paragraph_location(*paragraph),
            current.as_deref().map(|c| format!("alignment: {}", c)).unwrap_or_default(),
            expected.as_deref().map(|e| format!("alignment: {}", e)).unwrap_or_default(),
        ),
        IssueKind::ParagraphSpacing {
            paragraph,
            differences,
        } => {
            let (current, expected) = sides(differences);
            single(
                Anchor::Paragraph(*paragraph),
                paragraph_location(*paragraph),
                current,
                expected,
            )
        }
        IssueKind::RunFont {
            paragraph,
            differences,
            ..
        } => {
            let (current, expected) = sides(differences);
            single(
                Anchor::Paragraph(*paragraph),
                issue.location.clone(),
                current,
                expected,
            )
        }
        IssueKind::TableFormat { table, differences } => {
            let (current, expected) = sides(differences);
            single(Anchor::Table(*table), table_location(*table), current, expected)
        }
        IssueKind::ParagraphCount { document, template } => {
            count_records(issue, ids, *document, *template, "paragraph", Anchor::Paragraph)
        }
        IssueKind::TableCount { document, template } => {
            count_records(issue, ids, *document, *template, "table", Anchor::Table)
        }
        IssueKind::StylesMissing { names, .. } => single(
            Anchor::Paragraph(0),
            issue.location.clone(),
            String::new(),
            names.join(", "),
        ),
        IssueKind::StylesExtra { names, .. } => single(
            Anchor::Paragraph(0),
            issue.location.clone(),
            names.join(", "),
            String::new(),
        ),
        IssueKind::Generic => single(
            Anchor::Paragraph(paragraph_from_location(&issue.location).unwrap_or(0)),
            issue.location.clone(),
            current,
            expected,
        ),
    }
}

/// Expand every issue in order, ids running across issues.
pub fn expand_issues(issues: &[FormatIssue], ids: &mut CommentIdCounter) -> Vec<CommentRecord> {
    issues
        .iter()
        .flat_map(|issue| expand_issue(issue, ids))
        .collect()
}

/// A shortfall yields one record per missing unit, anchored at successive
/// indices from the last element the document has. A surplus yields one
/// record on the first extra element.
fn count_records(
    issue: &FormatIssue,
    ids: &mut CommentIdCounter,
    document: usize,
    template: usize,
    noun: &str,
    anchor: fn(usize) -> Anchor,
) -> Vec<CommentRecord> {
    let suggestion = issue.suggestions.join("; ");

    if document < template {
        let missing = template - document;
        let start = document.saturating_sub(1);
        (0..missing)
            .map(|k| CommentRecord {
                id: ids.next_id(),
                anchor: anchor(start + k),
                location: issue.location.clone(),
                problem: format!(
                    "{} (missing {} {} of {})",
                    issue.description,
                    noun,
                    k + 1,
                    missing
                ),
                current_format: format!("{} {}s", document, noun),
                expected_format: format!("{} {}s", template, noun),
                suggestion: suggestion.clone(),
            })
            .collect()
    } else {
        vec![CommentRecord {
            id: ids.next_id(),
            anchor: anchor(template),
            location: issue.location.clone(),
            problem: issue.description.clone(),
            current_format: format!("{} {}s", document, noun),
            expected_format: format!("{} {}s", template, noun),
            suggestion,
        }]
    }
}

fn sides(differences: &[Difference]) -> (String, String) {
    let current = differences
        .iter()
        .map(|d| format!("{}: {}", d.field, display_value(&d.current)))
        .collect::<Vec<_>>()
        .join("; ");
    let expected = differences
        .iter()
        .map(|d| format!("{}: {}", d.field, display_value(&d.expected)))
        .collect::<Vec<_>>()
        .join("; ");
    (current, expected)
}

fn display_value_or_empty(value: &serde_json::Value) -> String {
    if value.is_null() {
        String::new()
    } else {
        display_value(value)
    }
}

/// `"Paragraph 4 ..."` -> `Some(3)`.
fn paragraph_from_location(location: &str) -> Option<usize> {
    let rest = location.trim().strip_prefix("Paragraph ")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleKind;
    use crate::types::{IssueType, Severity};
    use serde_json::json;

    fn issue(kind: IssueKind, location: &str) -> FormatIssue {
        FormatIssue::new("id", kind, Severity::Medium, location, "description")
            .with_suggestion("first")
            .with_suggestion("second")
    }

    #[test]
    fn alignment_issue_anchors_on_its_paragraph() {
        let mut ids = CommentIdCounter::starting_at(0);
        let records = expand_issue(
            &issue(
                IssueKind::ParagraphAlignment {
                    paragraph: 4,
                    current: Some("left".into()),
                    expected: Some("center".into()),
                },
                "Paragraph 5",
            ),
            &mut ids,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].anchor, Anchor::Paragraph(4));
        assert_eq!(records[0].location, "Paragraph 5");
        assert_eq!(records[0].current_format, "alignment: left");
        assert_eq!(records[0].expected_format, "alignment: center");
        assert_eq!(records[0].suggestion, "first; second");
    }

    #[test]
    fn paragraph_shortfall_expands_per_missing_unit() {
        let mut ids = CommentIdCounter::starting_at(5);
        let records = expand_issue(
            &issue(
                IssueKind::ParagraphCount {
                    document: 2,
                    template: 5,
                },
                "Document",
            ),
            &mut ids,
        );

        let anchors: Vec<Anchor> = records.iter().map(|r| r.anchor).collect();
        assert_eq!(
            anchors,
            vec![Anchor::Paragraph(1), Anchor::Paragraph(2), Anchor::Paragraph(3)]
        );
        let record_ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(record_ids, vec![5, 6, 7]);
        assert_eq!(ids.peek(), 8);
    }

    #[test]
    fn surplus_anchors_on_first_extra_element() {
        let mut ids = CommentIdCounter::starting_at(0);
        let records = expand_issue(
            &issue(
                IssueKind::TableCount {
                    document: 3,
                    template: 1,
                },
                "Document",
            ),
            &mut ids,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].anchor, Anchor::Table(1));
    }

    #[test]
    fn generic_issue_echoes_description_and_suggestions() {
        let mut generic = issue(IssueKind::Generic, "Paragraph 3");
        generic.issue_type = IssueType::Content;
        generic.current = json!("12pt");

        let mut ids = CommentIdCounter::starting_at(0);
        let records = expand_issue(&generic, &mut ids);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].anchor, Anchor::Paragraph(2));
        assert_eq!(records[0].problem, "description");
        assert_eq!(records[0].current_format, "12pt");
        assert_eq!(records[0].expected_format, "");
        assert_eq!(records[0].suggestion, "first; second");
    }

    #[test]
    fn ids_run_across_issues() {
        let issues = vec![
            issue(
                IssueKind::RuleMissing {
                    kind: RuleKind::Font,
                    rule_id: "font1".into(),
                },
                "Font rule font1",
            ),
            issue(
                IssueKind::ParagraphCount {
                    document: 0,
                    template: 2,
                },
                "Document",
            ),
            issue(IssueKind::Generic, "Document"),
        ];
        let mut ids = CommentIdCounter::starting_at(0);
        let records = expand_issues(&issues, &mut ids);
        let record_ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(record_ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn location_parsing() {
        assert_eq!(paragraph_from_location("Paragraph 1"), Some(0));
        assert_eq!(paragraph_from_location("Paragraph 12, run 3"), Some(11));
        assert_eq!(paragraph_from_location("Paragraph 0"), None);
        assert_eq!(paragraph_from_location("Table 2"), None);
    }
}
