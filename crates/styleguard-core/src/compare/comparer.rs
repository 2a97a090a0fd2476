use super::identity::compare_rules;
use super::positional::compare_content;
use super::result::{
    mean_score, share_score, ComparisonOutcome, ContentComparison, FormatComparison,
    StyleComparison,
};
use super::settings::ComparisonSettings;
use super::styles::compare_styles;
use crate::error::{Result, Stage, StageContext};
use crate::model::{DocumentContent, FormatIssue, FormatRules};
use tracing::{debug, info};

/// Compares a document against a template: rule sets by id, content by
/// position, style sets by name.
pub struct FormatComparer;

impl FormatComparer {
    pub fn compare(
        document_rules: &FormatRules,
        template_rules: &FormatRules,
        document_content: Option<&DocumentContent>,
        template_content: Option<&DocumentContent>,
        settings: Option<&ComparisonSettings>,
    ) -> Result<ComparisonOutcome> {
        let default_settings = ComparisonSettings::default();
        let settings = settings.unwrap_or(&default_settings);

        template_rules.validate().stage(Stage::Validate)?;
        document_rules.validate().stage(Stage::Validate)?;

        let format = Self::compare_rule_sets(document_rules, template_rules, settings);

        let (content, style) = match (document_content, template_content) {
            (Some(document), Some(template)) => {
                let content = compare_content(document, template, settings);
                let style = if settings.compare_styles {
                    compare_styles(&document.styles, &template.styles)
                } else {
                    StyleComparison::vacuous()
                };
                (content, style)
            }
            _ => {
                debug!("no content on one side; content and style comparisons skipped");
                (ContentComparison::empty(), StyleComparison::vacuous())
            }
        };

        let issues = collect_issues(&format, &content, &style);
        info!(
            issues = issues.len(),
            format_score = format.score,
            content_score = content.score,
            style_score = style.score,
            "comparison finished"
        );

        Ok(ComparisonOutcome {
            format,
            content,
            style,
            issues,
        })
    }

    fn compare_rule_sets(
        document: &FormatRules,
        template: &FormatRules,
        settings: &ComparisonSettings,
    ) -> FormatComparison {
        let font_comparisons = compare_rules(&document.font_rules, &template.font_rules, settings);
        let paragraph_comparisons =
            compare_rules(&document.paragraph_rules, &template.paragraph_rules, settings);
        let table_comparisons =
            compare_rules(&document.table_rules, &template.table_rules, settings);
        let page_comparisons = compare_rules(&document.page_rules, &template.page_rules, settings);

        let mut format = FormatComparison {
            font_comparisons,
            paragraph_comparisons,
            table_comparisons,
            page_comparisons,
            score: 100.0,
            compliance_rate: 100.0,
        };
        format.score = mean_score(format.all().map(|c| c.score));
        format.compliance_rate = share_score(format.compliant_rules(), format.total_rules());
        format
    }
}

fn collect_issues(
    format: &FormatComparison,
    content: &ContentComparison,
    style: &StyleComparison,
) -> Vec<FormatIssue> {
    let rule_issues = format.all().flat_map(|c| c.issues.iter());
    let paragraph_issues = content
        .paragraph_comparisons
        .iter()
        .flat_map(|c| c.issues.iter());
    let table_issues = content
        .table_comparisons
        .iter()
        .flat_map(|c| c.issues.iter());
    let style_issues = style.elements().into_iter().flat_map(|e| e.issues.iter());

    rule_issues
        .chain(paragraph_issues)
        .chain(table_issues)
        .chain(content.structure_issues.iter())
        .chain(style_issues)
        .cloned()
        .collect()
}
