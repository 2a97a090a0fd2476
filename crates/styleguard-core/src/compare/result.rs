use crate::model::{Difference, FormatIssue, RuleKind, StyleCategory};
use serde::{Deserialize, Serialize};

/// How document and template entities were paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Rules paired by id.
    Identity,
    /// Content paired by list index up to the shorter list.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleComparison {
    pub rule_id: String,
    pub kind: RuleKind,
    pub strategy: MatchStrategy,
    pub compliant: bool,
    pub score: f64,
    pub differences: Vec<Difference>,
    pub issues: Vec<FormatIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Paragraph,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementComparison {
    pub element: ElementKind,
    pub index: usize,
    pub strategy: MatchStrategy,
    pub compliant: bool,
    pub score: f64,
    pub differences: Vec<Difference>,
    pub issues: Vec<FormatIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleElementComparison {
    pub category: StyleCategory,
    pub compliant: bool,
    pub score: f64,
    /// Template style names the document lacks.
    pub missing: Vec<String>,
    /// Document style names the template lacks.
    pub extra: Vec<String>,
    pub differences: Vec<Difference>,
    pub issues: Vec<FormatIssue>,
}

impl StyleElementComparison {
    pub fn vacuous(category: StyleCategory) -> Self {
        Self {
            category,
            compliant: true,
            score: 100.0,
            missing: Vec::new(),
            extra: Vec::new(),
            differences: Vec::new(),
            issues: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatComparison {
    pub font_comparisons: Vec<RuleComparison>,
    pub paragraph_comparisons: Vec<RuleComparison>,
    pub table_comparisons: Vec<RuleComparison>,
    pub page_comparisons: Vec<RuleComparison>,
    pub score: f64,
    pub compliance_rate: f64,
}

impl FormatComparison {
    pub fn all(&self) -> impl Iterator<Item = &RuleComparison> {
        self.font_comparisons
            .iter()
            .chain(&self.paragraph_comparisons)
            .chain(&self.table_comparisons)
            .chain(&self.page_comparisons)
    }

    pub fn total_rules(&self) -> usize {
        self.all().count()
    }

    pub fn compliant_rules(&self) -> usize {
        self.all().filter(|c| c.compliant).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentComparison {
    pub paragraph_comparisons: Vec<ElementComparison>,
    pub table_comparisons: Vec<ElementComparison>,
    pub structure_issues: Vec<FormatIssue>,
    pub score: f64,
}

impl ContentComparison {
    pub fn empty() -> Self {
        Self {
            paragraph_comparisons: Vec::new(),
            table_comparisons: Vec::new(),
            structure_issues: Vec::new(),
            score: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleComparison {
    pub paragraph_styles: StyleElementComparison,
    pub character_styles: StyleElementComparison,
    pub table_styles: StyleElementComparison,
    pub score: f64,
}

impl StyleComparison {
    pub fn vacuous() -> Self {
        Self {
            paragraph_styles: StyleElementComparison::vacuous(StyleCategory::Paragraph),
            character_styles: StyleElementComparison::vacuous(StyleCategory::Character),
            table_styles: StyleElementComparison::vacuous(StyleCategory::Table),
            score: 100.0,
        }
    }

    pub fn elements(&self) -> [&StyleElementComparison; 3] {
        [
            &self.paragraph_styles,
            &self.character_styles,
            &self.table_styles,
        ]
    }
}

/// Everything one `compare` call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub format: FormatComparison,
    pub content: ContentComparison,
    pub style: StyleComparison,
    /// Issues of all three comparisons, in format, content, style order.
    pub issues: Vec<FormatIssue>,
}

impl ComparisonOutcome {
    /// Unweighted mean of the format, content and style scores.
    pub fn overall_score(&self) -> f64 {
        (self.format.score + self.content.score + self.style.score) / 3.0
    }
}

/// Mean of `scores`, or 100 when there are none.
pub(crate) fn mean_score(scores: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        100.0
    } else {
        sum / count as f64
    }
}

/// Share of `matched` out of `checked`, scaled to 100; 100 when nothing was checked.
pub(crate) fn share_score(matched: usize, checked: usize) -> f64 {
    if checked == 0 {
        100.0
    } else {
        matched as f64 / checked as f64 * 100.0
    }
}
