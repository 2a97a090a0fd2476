//! Deriving a [`FormatRules`] set from document content.
//!
//! Each distinct formatting combination becomes one rule, numbered in order
//! of first appearance (`font1`, `para1`, `table1`, `page1`, ...). Two
//! documents formatted the same way therefore produce the same rule ids.

use crate::model::{
    DocumentContent, FontRule, FormatRules, PageRule, ParagraphRule, RunFont, Section, TableRule,
};
use tracing::debug;

pub fn extract_rules(content: &DocumentContent) -> FormatRules {
    let rules = FormatRules {
        font_rules: font_rules(content),
        paragraph_rules: paragraph_rules(content),
        table_rules: table_rules(content),
        page_rules: page_rules(&content.sections),
    };

    debug!(
        fonts = rules.font_rules.len(),
        paragraphs = rules.paragraph_rules.len(),
        tables = rules.table_rules.len(),
        pages = rules.page_rules.len(),
        "rules extracted"
    );
    rules
}

/// Push `candidate` unless an equal rule (ignoring the id) is already there.
fn push_distinct<R>(rules: &mut Vec<R>, candidate: R, same: impl Fn(&R, &R) -> bool) {
    if !rules.iter().any(|existing| same(existing, &candidate)) {
        rules.push(candidate);
    }
}

fn font_rules(content: &DocumentContent) -> Vec<FontRule> {
    let mut rules: Vec<FontRule> = Vec::new();

    for run in content.paragraphs.iter().flat_map(|p| &p.runs) {
        let RunFont {
            name: Some(name),
            size,
            color,
            bold,
            italic,
        } = &run.font
        else {
            continue;
        };
        if name.trim().is_empty() || size.is_some_and(|s| s <= 0.0) {
            continue;
        }

        let candidate = FontRule {
            id: format!("font{}", rules.len() + 1),
            name: name.clone(),
            size: *size,
            color: color.clone(),
            bold: Some(*bold),
            italic: Some(*italic),
        };
        push_distinct(&mut rules, candidate, |a, b| {
            a.name == b.name
                && a.size == b.size
                && a.color == b.color
                && a.bold == b.bold
                && a.italic == b.italic
        });
    }

    rules
}

fn paragraph_rules(content: &DocumentContent) -> Vec<ParagraphRule> {
    let mut rules: Vec<ParagraphRule> = Vec::new();

    for paragraph in &content.paragraphs {
        let candidate = ParagraphRule {
            id: format!("para{}", rules.len() + 1),
            alignment: paragraph.alignment.clone(),
            line_spacing: paragraph.spacing.line,
            space_before: paragraph.spacing.before,
            space_after: paragraph.spacing.after,
        };
        if candidate.alignment.is_none()
            && candidate.line_spacing.is_none()
            && candidate.space_before.is_none()
            && candidate.space_after.is_none()
        {
            continue;
        }
        push_distinct(&mut rules, candidate, |a, b| {
            a.alignment == b.alignment
                && a.line_spacing == b.line_spacing
                && a.space_before == b.space_before
                && a.space_after == b.space_after
        });
    }

    rules
}

fn table_rules(content: &DocumentContent) -> Vec<TableRule> {
    let mut rules: Vec<TableRule> = Vec::new();

    for table in &content.tables {
        let width = table.width.filter(|w| *w > 0.0);
        if width.is_none() && table.alignment.is_none() {
            continue;
        }
        let candidate = TableRule {
            id: format!("table{}", rules.len() + 1),
            width,
            alignment: table.alignment.clone(),
        };
        push_distinct(&mut rules, candidate, |a, b| {
            a.width == b.width && a.alignment == b.alignment
        });
    }

    rules
}

fn page_rules(sections: &[Section]) -> Vec<PageRule> {
    let mut rules: Vec<PageRule> = Vec::new();
    let positive = |v: Option<f64>| v.filter(|v| *v > 0.0);

    for section in sections {
        let candidate = PageRule {
            id: format!("page{}", rules.len() + 1),
            width: positive(section.page_width),
            height: positive(section.page_height),
            margin_top: section.margins.top,
            margin_bottom: section.margins.bottom,
            margin_left: section.margins.left,
            margin_right: section.margins.right,
        };
        if candidate.width.is_none() && candidate.height.is_none() {
            continue;
        }
        push_distinct(&mut rules, candidate, |a, b| {
            a.width == b.width
                && a.height == b.height
                && a.margin_top == b.margin_top
                && a.margin_bottom == b.margin_bottom
                && a.margin_left == b.margin_left
                && a.margin_right == b.margin_right
        });
    }

    rules
}
