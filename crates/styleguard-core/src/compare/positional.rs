//! Positional matching of document content: paragraphs, runs and tables are
//! paired by index up to the shorter list. Entries past that point are only
//! covered by the element-count check.

use super::identity::{check_keyword, check_number, snapshots, FieldCheck};
use super::result::{mean_score, share_score, ContentComparison, ElementComparison, ElementKind, MatchStrategy};
use super::settings::ComparisonSettings;
use crate::model::{
    paragraph_location, table_location, Difference, DocumentContent, FormatIssue, IssueKind,
    Paragraph, Run, Table,
};
use crate::types::Severity;
use serde_json::json;

/// Word's implicit paragraph alignment.
const DEFAULT_ALIGNMENT: &str = "left";

pub(crate) fn compare_content(
    document: &DocumentContent,
    template: &DocumentContent,
    settings: &ComparisonSettings,
) -> ContentComparison {
    let paragraph_comparisons: Vec<ElementComparison> = document
        .paragraphs
        .iter()
        .zip(&template.paragraphs)
        .enumerate()
        .map(|(index, (doc, tpl))| compare_paragraph(index, doc, tpl, settings))
        .collect();

    let table_comparisons: Vec<ElementComparison> = document
        .tables
        .iter()
        .zip(&template.tables)
        .enumerate()
        .map(|(index, (doc, tpl))| compare_table(index, doc, tpl, settings))
        .collect();

    let mut structure_issues = Vec::new();
    if settings.check_element_counts {
        let (doc_paragraphs, tpl_paragraphs) =
            (document.paragraphs.len(), template.paragraphs.len());
        if doc_paragraphs != tpl_paragraphs {
            structure_issues.push(count_issue(
                IssueKind::ParagraphCount {
                    document: doc_paragraphs,
                    template: tpl_paragraphs,
                },
                "paragraph_count",
                "paragraphs",
                doc_paragraphs,
                tpl_paragraphs,
            ));
        }

        let (doc_tables, tpl_tables) = (document.tables.len(), template.tables.len());
        if doc_tables != tpl_tables {
            structure_issues.push(count_issue(
                IssueKind::TableCount {
                    document: doc_tables,
                    template: tpl_tables,
                },
                "table_count",
                "tables",
                doc_tables,
                tpl_tables,
            ));
        }
    }

    let score = mean_score(
        paragraph_comparisons
            .iter()
            .chain(&table_comparisons)
            .map(|c| c.score),
    );

    ContentComparison {
        paragraph_comparisons,
        table_comparisons,
        structure_issues,
        score,
    }
}

fn compare_paragraph(
    index: usize,
    document: &Paragraph,
    template: &Paragraph,
    settings: &ComparisonSettings,
) -> ElementComparison {
    let mut checked = 0;
    let mut matched = 0;
    let mut differences = Vec::new();
    let mut issues = Vec::new();

    let current_alignment = document.alignment.as_deref().unwrap_or(DEFAULT_ALIGNMENT);
    let expected_alignment = template.alignment.as_deref().unwrap_or(DEFAULT_ALIGNMENT);
    checked += 1;
    if current_alignment.eq_ignore_ascii_case(expected_alignment) {
        matched += 1;
    } else {
        differences.push(Difference::new(
            "alignment",
            current_alignment,
            expected_alignment,
        ));
        issues.push(
            FormatIssue::new(
                format!("paragraph_format_{}", index + 1),
                IssueKind::ParagraphAlignment {
                    paragraph: index,
                    current: Some(current_alignment.to_string()),
                    expected: Some(expected_alignment.to_string()),
                },
                Severity::Medium,
                paragraph_location(index),
                format!(
                    "Paragraph alignment is '{}' but the template uses '{}'",
                    current_alignment, expected_alignment
                ),
            )
            .with_current(json!({ "alignment": current_alignment }))
            .with_expected(json!({ "alignment": expected_alignment }))
            .with_suggestion(format!("Set paragraph alignment to {}", expected_alignment)),
        );
    }

    let spacing_checks = [
        ("space_before", document.spacing.before, template.spacing.before),
        ("space_after", document.spacing.after, template.spacing.after),
    ];
    let mut spacing_differences = Vec::new();
    for (field, current, expected) in spacing_checks {
        checked += 1;
        if settings.numbers_match(current, expected) {
            matched += 1;
        } else {
            spacing_differences.push(Difference::new(field, current, expected));
        }
    }
    if !spacing_differences.is_empty() {
        issues.push(spacing_issue(index, &spacing_differences));
        differences.extend(spacing_differences);
    }

    for (run_index, (doc_run, tpl_run)) in document.runs.iter().zip(&template.runs).enumerate() {
        let checks = run_font_checks(doc_run, tpl_run, settings);
        checked += checks.len();
        matched += checks.iter().filter(|c| c.matches).count();

        let run_differences: Vec<Difference> = checks
            .iter()
            .filter(|c| !c.matches)
            .map(|c| Difference::new(c.field, c.current.clone(), c.expected.clone()))
            .collect();
        if !run_differences.is_empty() {
            issues.push(run_font_issue(index, run_index, &run_differences));
            differences.extend(run_differences);
        }
    }

    ElementComparison {
        element: ElementKind::Paragraph,
        index,
        strategy: MatchStrategy::Positional,
        compliant: differences.is_empty(),
        score: share_score(matched, checked),
        differences,
        issues,
    }
}

fn spacing_issue(index: usize, differences: &[Difference]) -> FormatIssue {
    let (current, expected) = snapshots(differences);
    let mut issue = FormatIssue::new(
        format!("paragraph_spacing_{}", index + 1),
        IssueKind::ParagraphSpacing {
            paragraph: index,
            differences: differences.to_vec(),
        },
        Severity::Low,
        paragraph_location(index),
        "Paragraph spacing differs from the template",
    )
    .with_current(current)
    .with_expected(expected);
    for d in differences {
        issue = issue.with_suggestion(format!("Change {}", d.describe()));
    }
    issue
}

/// Font name (exact), size, color (case-insensitive), bold and italic.
fn run_font_checks(document: &Run, template: &Run, settings: &ComparisonSettings) -> Vec<FieldCheck> {
    let (doc, tpl) = (&document.font, &template.font);
    let mut checks = vec![FieldCheck {
        field: "font name",
        current: doc.name.as_deref().into(),
        expected: tpl.name.as_deref().into(),
        matches: doc.name == tpl.name,
    }];

    checks.push(FieldCheck {
        field: "font size",
        current: doc.size.into(),
        expected: tpl.size.into(),
        matches: settings.numbers_match(doc.size, tpl.size),
    });

    checks.push(FieldCheck {
        field: "color",
        current: doc.color.as_deref().into(),
        expected: tpl.color.as_deref().into(),
        matches: match (&doc.color, &tpl.color) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        },
    });

    for (field, current, expected) in [
        ("bold", doc.bold, tpl.bold),
        ("italic", doc.italic, tpl.italic),
    ] {
        checks.push(FieldCheck {
            field,
            current: current.into(),
            expected: expected.into(),
            matches: current == expected,
        });
    }

    checks
}

fn run_font_issue(paragraph: usize, run: usize, differences: &[Difference]) -> FormatIssue {
    let (current, expected) = snapshots(differences);
    let summary = differences
        .iter()
        .map(Difference::describe)
        .collect::<Vec<_>>()
        .join("; ");

    FormatIssue::new(
        format!("run_font_{}_{}", paragraph + 1, run + 1),
        IssueKind::RunFont {
            paragraph,
            run,
            differences: differences.to_vec(),
        },
        Severity::Medium,
        format!("{}, run {}", paragraph_location(paragraph), run + 1),
        format!("Run font differs from the template in {} field(s)", differences.len()),
    )
    .with_current(current)
    .with_expected(expected)
    .with_suggestion(summary)
}

fn compare_table(
    index: usize,
    document: &Table,
    template: &Table,
    settings: &ComparisonSettings,
) -> ElementComparison {
    let checks: Vec<FieldCheck> = [
        check_number("width", document.width, template.width, settings),
        check_keyword(
            "alignment",
            document.alignment.as_deref(),
            template.alignment.as_deref(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    let matched = checks.iter().filter(|c| c.matches).count();
    let differences: Vec<Difference> = checks
        .iter()
        .filter(|c| !c.matches)
        .map(|c| Difference::new(c.field, c.current.clone(), c.expected.clone()))
        .collect();

    let mut issues = Vec::new();
    if !differences.is_empty() {
        let (current, expected) = snapshots(&differences);
        let mut issue = FormatIssue::new(
            format!("table_format_{}", index + 1),
            IssueKind::TableFormat {
                table: index,
                differences: differences.clone(),
            },
            Severity::Medium,
            table_location(index),
            "Table format differs from the template",
        )
        .with_current(current)
        .with_expected(expected);
        for d in &differences {
            issue = issue.with_suggestion(format!("Change {}", d.describe()));
        }
        issues.push(issue);
    }

    ElementComparison {
        element: ElementKind::Table,
        index,
        strategy: MatchStrategy::Positional,
        compliant: differences.is_empty(),
        score: share_score(matched, checks.len()),
        differences,
        issues,
    }
}

fn count_issue(
    kind: IssueKind,
    id: &str,
    noun: &str,
    document: usize,
    template: usize,
) -> FormatIssue {
    let suggestion = if document < template {
        format!("Add {} {} to match the template", template - document, noun)
    } else {
        format!("Remove {} {} to match the template", document - template, noun)
    };

    FormatIssue::new(
        id,
        kind,
        Severity::Medium,
        "Document",
        format!(
            "Document has {} {} but the template has {}",
            document, noun, template
        ),
    )
    .with_current(json!({ noun: document }))
    .with_expected(json!({ noun: template }))
    .with_suggestion(suggestion)
}
