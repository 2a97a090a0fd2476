use super::rules::RuleKind;
use crate::types::{IssueType, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One field that differs between document and template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub field: String,
    pub current: Value,
    pub expected: Value,
}

impl Difference {
    pub fn new(field: &str, current: impl Into<Value>, expected: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            current: current.into(),
            expected: expected.into(),
        }
    }

    /// `"font size: 10.5 -> 12"`
    pub fn describe(&self) -> String {
        format!(
            "{}: {} -> {}",
            self.field,
            display_value(&self.current),
            display_value(&self.expected)
        )
    }
}

/// Render a JSON snapshot as plain text for comment bodies.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "unset".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Paragraph,
    Character,
    Table,
}

impl StyleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleCategory::Paragraph => "paragraph",
            StyleCategory::Character => "character",
            StyleCategory::Table => "table",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What produced an issue, with the data its review comment needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IssueKind {
    RuleMissing {
        kind: RuleKind,
        rule_id: String,
    },
    RuleMismatch {
        kind: RuleKind,
        rule_id: String,
        differences: Vec<Difference>,
    },
    ParagraphAlignment {
        paragraph: usize,
        current: Option<String>,
        expected: Option<String>,
    },
    ParagraphSpacing {
        paragraph: usize,
        differences: Vec<Difference>,
    },
    RunFont {
        paragraph: usize,
        run: usize,
        differences: Vec<Difference>,
    },
    TableFormat {
        table: usize,
        differences: Vec<Difference>,
    },
    ParagraphCount {
        document: usize,
        template: usize,
    },
    TableCount {
        document: usize,
        template: usize,
    },
    StylesMissing {
        category: StyleCategory,
        names: Vec<String>,
    },
    StylesExtra {
        category: StyleCategory,
        names: Vec<String>,
    },
    /// Caller-built issues and JSON issues whose fields do not fit their rule.
    #[default]
    Generic,
}

impl IssueKind {
    /// Machine tag stored in [`FormatIssue::rule`].
    pub fn rule_tag(&self) -> &'static str {
        match self {
            IssueKind::RuleMissing { kind, .. } => match kind {
                RuleKind::Font => "font_missing",
                RuleKind::Paragraph => "paragraph_missing",
                RuleKind::Table => "table_missing",
                RuleKind::Page => "page_missing",
            },
            IssueKind::RuleMismatch { kind, .. } => match kind {
                RuleKind::Font => "font_mismatch",
                RuleKind::Paragraph => "paragraph_mismatch",
                RuleKind::Table => "table_mismatch",
                RuleKind::Page => "page_mismatch",
            },
            IssueKind::ParagraphAlignment { .. } => "paragraph_format",
            IssueKind::ParagraphSpacing { .. } => "paragraph_spacing",
            IssueKind::RunFont { .. } => "run_font",
            IssueKind::TableFormat { .. } => "table_format",
            IssueKind::ParagraphCount { .. } => "paragraph_count",
            IssueKind::TableCount { .. } => "table_count",
            IssueKind::StylesMissing { .. } => "style_missing",
            IssueKind::StylesExtra { .. } => "style_extra",
            IssueKind::Generic => "generic",
        }
    }

    pub fn issue_type(&self) -> IssueType {
        match self {
            IssueKind::RuleMissing { kind, .. } | IssueKind::RuleMismatch { kind, .. } => {
                match kind {
                    RuleKind::Font => IssueType::Font,
                    RuleKind::Paragraph => IssueType::Paragraph,
                    RuleKind::Table => IssueType::Table,
                    RuleKind::Page => IssueType::Page,
                }
            }
            IssueKind::ParagraphAlignment { .. } | IssueKind::ParagraphSpacing { .. } => {
                IssueType::Paragraph
            }
            IssueKind::RunFont { .. } => IssueType::Font,
            IssueKind::TableFormat { .. } => IssueType::Table,
            IssueKind::ParagraphCount { .. } | IssueKind::TableCount { .. } => {
                IssueType::Structure
            }
            IssueKind::StylesMissing { .. } | IssueKind::StylesExtra { .. } => IssueType::Style,
            IssueKind::Generic => IssueType::Content,
        }
    }
}

/// A detected deviation from the template.
///
/// `kind` is not part of the wire shape. Deserialization rebuilds it from
/// `rule`, `location`, `current` and `expected`; an issue whose fields do not
/// fit its rule tag comes back as [`IssueKind::Generic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireIssue")]
pub struct FormatIssue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub current: Value,
    #[serde(default)]
    pub expected: Value,
    pub rule: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(skip)]
    pub kind: IssueKind,
}

impl FormatIssue {
    /// Type and rule tag are derived from `kind`.
    pub fn new(
        id: impl Into<String>,
        kind: IssueKind,
        severity: Severity,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            issue_type: kind.issue_type(),
            severity,
            location: location.into(),
            description: description.into(),
            current: Value::Null,
            expected: Value::Null,
            rule: kind.rule_tag().to_string(),
            suggestions: Vec::new(),
            kind,
        }
    }

    pub fn with_current(mut self, current: impl Into<Value>) -> Self {
        self.current = current.into();
        self
    }

    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// The serialized fields of a [`FormatIssue`].
#[derive(Deserialize)]
struct WireIssue {
    id: String,
    #[serde(rename = "type")]
    issue_type: IssueType,
    severity: Severity,
    location: String,
    description: String,
    #[serde(default)]
    current: Value,
    #[serde(default)]
    expected: Value,
    rule: String,
    #[serde(default)]
    suggestions: Vec<String>,
}

impl From<WireIssue> for FormatIssue {
    fn from(wire: WireIssue) -> Self {
        let kind = IssueKind::from_wire(
            &wire.rule,
            &wire.id,
            &wire.location,
            &wire.current,
            &wire.expected,
        )
        .unwrap_or_default();

        Self {
            id: wire.id,
            issue_type: wire.issue_type,
            severity: wire.severity,
            location: wire.location,
            description: wire.description,
            current: wire.current,
            expected: wire.expected,
            rule: wire.rule,
            suggestions: wire.suggestions,
            kind,
        }
    }
}

impl IssueKind {
    /// Rebuild the kind of a serialized issue from its rule tag and
    /// snapshots. `None` when the fields do not carry what the rule needs.
    pub fn from_wire(
        rule: &str,
        id: &str,
        location: &str,
        current: &Value,
        expected: &Value,
    ) -> Option<IssueKind> {
        let kind = match rule {
            "paragraph_format" => IssueKind::ParagraphAlignment {
                paragraph: indexed_location(location, "Paragraph ")?,
                current: field_string(current, "alignment"),
                expected: field_string(expected, "alignment"),
            },
            "paragraph_spacing" => IssueKind::ParagraphSpacing {
                paragraph: indexed_location(location, "Paragraph ")?,
                differences: differences_from(current, expected),
            },
            "run_font" => {
                let (paragraph, run) = location.split_once(", run ")?;
                IssueKind::RunFont {
                    paragraph: indexed_location(paragraph, "Paragraph ")?,
                    run: indexed_location(run, "")?,
                    differences: differences_from(current, expected),
                }
            }
            "table_format" => IssueKind::TableFormat {
                table: indexed_location(location, "Table ")?,
                differences: differences_from(current, expected),
            },
            "paragraph_count" => IssueKind::ParagraphCount {
                document: count_field(current, "paragraphs")?,
                template: count_field(expected, "paragraphs")?,
            },
            "table_count" => IssueKind::TableCount {
                document: count_field(current, "tables")?,
                template: count_field(expected, "tables")?,
            },
            "style_missing" => IssueKind::StylesMissing {
                category: style_category(id.strip_prefix("style_missing_")?)?,
                names: string_list(expected)?,
            },
            "style_extra" => IssueKind::StylesExtra {
                category: style_category(id.strip_prefix("style_extra_")?)?,
                names: string_list(current)?,
            },
            _ => {
                let (prefix, suffix) = rule.rsplit_once('_')?;
                let kind = rule_kind(prefix)?;
                match suffix {
                    "missing" => IssueKind::RuleMissing {
                        kind,
                        rule_id: id.strip_prefix(rule)?.strip_prefix('_')?.to_string(),
                    },
                    "mismatch" => IssueKind::RuleMismatch {
                        kind,
                        rule_id: id.strip_prefix(rule)?.strip_prefix('_')?.to_string(),
                        differences: differences_from(current, expected),
                    },
                    _ => return None,
                }
            }
        };
        Some(kind)
    }
}

/// `"Table 3"` with prefix `"Table "` -> `Some(2)`.
fn indexed_location(location: &str, prefix: &str) -> Option<usize> {
    let rest = location.trim().strip_prefix(prefix)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<usize>().ok()?.checked_sub(1)
}

fn field_string(snapshot: &Value, field: &str) -> Option<String> {
    snapshot.get(field)?.as_str().map(str::to_string)
}

fn count_field(snapshot: &Value, field: &str) -> Option<usize> {
    usize::try_from(snapshot.get(field)?.as_u64()?).ok()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// One difference per field of either snapshot, in the order the current
/// snapshot lists them.
fn differences_from(current: &Value, expected: &Value) -> Vec<Difference> {
    let mut fields: Vec<&String> = Vec::new();
    for snapshot in [current, expected] {
        if let Some(map) = snapshot.as_object() {
            for key in map.keys() {
                if !fields.contains(&key) {
                    fields.push(key);
                }
            }
        }
    }
    fields
        .into_iter()
        .map(|field| Difference {
            field: field.clone(),
            current: current.get(field).cloned().unwrap_or(Value::Null),
            expected: expected.get(field).cloned().unwrap_or(Value::Null),
        })
        .collect()
}

fn rule_kind(name: &str) -> Option<RuleKind> {
    match name {
        "font" => Some(RuleKind::Font),
        "paragraph" => Some(RuleKind::Paragraph),
        "table" => Some(RuleKind::Table),
        "page" => Some(RuleKind::Page),
        _ => None,
    }
}

fn style_category(name: &str) -> Option<StyleCategory> {
    match name {
        "paragraph" => Some(StyleCategory::Paragraph),
        "character" => Some(StyleCategory::Character),
        "table" => Some(StyleCategory::Table),
        _ => None,
    }
}

/// `"Paragraph 3"` for index 2.
pub fn paragraph_location(index: usize) -> String {
    format!("Paragraph {}", index + 1)
}

pub fn table_location(index: usize) -> String {
    format!("Table {}", index + 1)
}
