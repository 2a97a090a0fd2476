use crate::error::{Result, StyleguardError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four rule families a template governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Font,
    Paragraph,
    Table,
    Page,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Font => "font",
            RuleKind::Paragraph => "paragraph",
            RuleKind::Table => "table",
            RuleKind::Page => "page",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontRule {
    pub id: String,
    pub name: String,
    pub size: Option<f64>,
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl FontRule {
    pub fn new(id: &str, name: &str, size: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size: Some(size),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRule {
    pub id: String,
    pub alignment: Option<String>,
    pub line_spacing: Option<f64>,
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRule {
    pub id: String,
    pub width: Option<f64>,
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRule {
    pub id: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_right: Option<f64>,
}

/// Rule set extracted from a template (or a document) and compared by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatRules {
    #[serde(default)]
    pub font_rules: Vec<FontRule>,
    #[serde(default)]
    pub paragraph_rules: Vec<ParagraphRule>,
    #[serde(default)]
    pub table_rules: Vec<TableRule>,
    #[serde(default)]
    pub page_rules: Vec<PageRule>,
}

impl FormatRules {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.font_rules.len()
            + self.paragraph_rules.len()
            + self.table_rules.len()
            + self.page_rules.len()
    }

    /// Structural checks run before any comparison.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.font_rules {
            require_id(RuleKind::Font, &rule.id)?;
            if rule.name.trim().is_empty() {
                return Err(StyleguardError::validation(format!(
                    "font rule '{}' has no font name",
                    rule.id
                )));
            }
            require_positive(&rule.id, "size", rule.size)?;
        }
        for rule in &self.paragraph_rules {
            require_id(RuleKind::Paragraph, &rule.id)?;
        }
        for rule in &self.table_rules {
            require_id(RuleKind::Table, &rule.id)?;
            require_positive(&rule.id, "width", rule.width)?;
        }
        for rule in &self.page_rules {
            require_id(RuleKind::Page, &rule.id)?;
            require_positive(&rule.id, "width", rule.width)?;
            require_positive(&rule.id, "height", rule.height)?;
        }
        Ok(())
    }
}

fn require_id(kind: RuleKind, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(StyleguardError::validation(format!(
            "{} rule without an id",
            kind
        )));
    }
    Ok(())
}

fn require_positive(id: &str, field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if v.is_nan() || v <= 0.0 => Err(StyleguardError::validation(format!(
            "rule '{}' has non-positive {} {}",
            id, field, v
        ))),
        _ => Ok(()),
    }
}
