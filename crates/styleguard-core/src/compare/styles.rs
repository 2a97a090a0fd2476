use super::result::{mean_score, share_score, StyleComparison, StyleElementComparison};
use crate::model::{Difference, FormatIssue, IssueKind, StyleCategory, StyleSet};
use crate::types::Severity;
use serde_json::Value;
use std::collections::HashSet;

pub(crate) fn compare_styles(document: &StyleSet, template: &StyleSet) -> StyleComparison {
    let paragraph_styles = compare_names(
        StyleCategory::Paragraph,
        &document.paragraph,
        &template.paragraph,
    );
    let character_styles = compare_names(
        StyleCategory::Character,
        &document.character,
        &template.character,
    );
    let table_styles = compare_names(StyleCategory::Table, &document.table, &template.table);

    let score = mean_score([
        paragraph_styles.score,
        character_styles.score,
        table_styles.score,
    ]);

    StyleComparison {
        paragraph_styles,
        character_styles,
        table_styles,
        score,
    }
}

/// Compare one category by name only.
fn compare_names(
    category: StyleCategory,
    document: &[String],
    template: &[String],
) -> StyleElementComparison {
    let document_names: HashSet<&str> = document.iter().map(String::as_str).collect();
    let template_names: HashSet<&str> = template.iter().map(String::as_str).collect();

    let missing: Vec<String> = dedup_in_order(template)
        .filter(|name| !document_names.contains(name))
        .map(str::to_string)
        .collect();
    let extra: Vec<String> = dedup_in_order(document)
        .filter(|name| !template_names.contains(name))
        .map(str::to_string)
        .collect();

    let mut differences = Vec::new();
    let mut issues = Vec::new();

    if !missing.is_empty() {
        differences.push(Difference::new(
            "missing",
            Value::Null,
            missing.clone(),
        ));
        issues.push(
            FormatIssue::new(
                format!("style_missing_{}", category),
                IssueKind::StylesMissing {
                    category,
                    names: missing.clone(),
                },
                Severity::Medium,
                format!("{} styles", capitalize(category.as_str())),
                format!(
                    "Document lacks {} template {} style(s): {}",
                    missing.len(),
                    category,
                    missing.join(", ")
                ),
            )
            .with_expected(missing.clone())
            .with_suggestion(format!("Define the styles {}", missing.join(", "))),
        );
    }

    if !extra.is_empty() {
        differences.push(Difference::new("extra", extra.clone(), Value::Null));
        issues.push(
            FormatIssue::new(
                format!("style_extra_{}", category),
                IssueKind::StylesExtra {
                    category,
                    names: extra.clone(),
                },
                Severity::Low,
                format!("{} styles", capitalize(category.as_str())),
                format!(
                    "Document defines {} {} style(s) the template does not: {}",
                    extra.len(),
                    category,
                    extra.join(", ")
                ),
            )
            .with_current(extra.clone())
            .with_suggestion(format!(
                "Replace {} with template styles",
                extra.join(", ")
            )),
        );
    }

    let unique_template = template_names.len();
    let matched = unique_template - missing.len();

    StyleElementComparison {
        category,
        compliant: missing.is_empty() && extra.is_empty(),
        score: share_score(matched, unique_template),
        missing,
        extra,
        differences,
        issues,
    }
}

fn dedup_in_order(names: &[String]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .filter(move |name| seen.insert(*name))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
