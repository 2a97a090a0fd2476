//! One-shot check pipelines: compare, then optionally annotate a copy.

use crate::annotate::{AnnotationSettings, Annotator};
use crate::compare::{ComparisonReport, ComparisonSettings, FormatComparer};
use crate::error::{Result, Stage, StageContext, StyleguardError};
use crate::extract::extract_rules;
use crate::model::{DocumentContent, FormatRules};
use crate::wml::read_path;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Settings for a whole check run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerSettings {
    pub comparison: ComparisonSettings,
    pub annotation: AnnotationSettings,
}

impl CheckerSettings {
    /// Load settings from JSON. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StyleguardError::io(path, e))?;
        Self::from_json(&text).map_err(|e| {
            StyleguardError::validation(format!("settings file '{}': {}", path.display(), e))
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Everything one comparison needs. Content is optional; without it only
/// the rule sets are compared.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    /// Package the annotated copy is made from.
    pub document_path: &'a Path,
    /// Reported only.
    pub template_path: &'a Path,
    pub document_rules: &'a FormatRules,
    pub template_rules: &'a FormatRules,
    pub document_content: Option<&'a DocumentContent>,
    pub template_content: Option<&'a DocumentContent>,
}

/// Whether and where [`FormatChecker::check_files`] writes an annotated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationTarget<'a> {
    None,
    /// Next to the document, stem suffixed.
    Beside,
    To(&'a Path),
}

#[derive(Debug, Clone, Default)]
pub struct FormatChecker {
    settings: CheckerSettings,
}

impl FormatChecker {
    pub fn new(settings: CheckerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CheckerSettings {
        &self.settings
    }

    /// Report-only check.
    pub fn check(&self, input: &CheckInput<'_>) -> Result<ComparisonReport> {
        let outcome = FormatComparer::compare(
            input.document_rules,
            input.template_rules,
            input.document_content,
            input.template_content,
            Some(&self.settings.comparison),
        )
        .stage(Stage::Compare)?;

        Ok(ComparisonReport::from_outcome(
            input.document_path.display().to_string(),
            input.template_path.display().to_string(),
            outcome,
        ))
    }

    /// Check, then write an annotated copy of the document to `destination`
    /// (or next to it, with the configured suffix). Nothing is written when
    /// the report has no issues. A failed annotation still returns the
    /// report, with a warning and no `annotated_path`.
    pub fn check_and_annotate(
        &self,
        input: &CheckInput<'_>,
        destination: Option<&Path>,
    ) -> Result<ComparisonReport> {
        let mut report = self.check(input)?;
        if report.issues.is_empty() {
            debug!(document = %input.document_path.display(), "no issues; annotation skipped");
            return Ok(report);
        }

        let annotator = Annotator::new(self.settings.annotation.clone());
        let result = match destination {
            Some(destination) => annotator.annotate_to(input.document_path, &report.issues, destination),
            None => annotator.annotate(input.document_path, &report.issues),
        };

        match result {
            Ok(path) => {
                info!(path = %path.display(), "annotated copy written");
                report.annotated_path = Some(path.display().to_string());
            }
            Err(error) => {
                warn!(%error, document = %input.document_path.display(), "annotation failed; returning report only");
                report.warnings.push(format!("annotation failed: {}", error));
            }
        }

        Ok(report)
    }

    /// Read both packages, extract their rules and compare them.
    pub fn check_files(
        &self,
        document: &Path,
        template: &Path,
        annotate: AnnotationTarget<'_>,
    ) -> Result<ComparisonReport> {
        let document_content = read_path(document).stage(Stage::Read)?;
        let template_content = read_path(template).stage(Stage::Read)?;

        let document_rules = extract_rules(&document_content);
        let template_rules = extract_rules(&template_content);
        template_rules.validate().stage(Stage::Extract)?;

        let input = CheckInput {
            document_path: document,
            template_path: template,
            document_rules: &document_rules,
            template_rules: &template_rules,
            document_content: Some(&document_content),
            template_content: Some(&template_content),
        };

        match annotate {
            AnnotationTarget::None => self.check(&input),
            AnnotationTarget::Beside => self.check_and_annotate(&input, None),
            AnnotationTarget::To(destination) => self.check_and_annotate(&input, Some(destination)),
        }
    }
}
