use super::comments::{build_comments_part, existing_comment_ids};
use super::expand::expand_issues;
use super::inject::{anchored_comment_ids, inject_comments};
use super::record::CommentIdCounter;
use super::settings::AnnotationSettings;
use crate::error::{Result, Stage, StageContext, StyleguardError};
use crate::model::FormatIssue;
use crate::package::ooxml::CONTENT_TYPES_PATH;
use crate::package::relationships::{ensure_relationship, parse_relationships, relationship_types, relationships_part_for};
use crate::package::rewriter::{AppendedPart, PackageRewriter, PartAction};
use crate::package::verify::{part_digests, verify_passthrough};
use crate::package::{content_type_values, ensure_override, OoxmlPackage};
use crate::xml::builder::serialize_bytes;
use crate::xml::parser::parse_part;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_COMMENTS_TARGET: &str = "comments.xml";

/// Writes review comments for a list of issues into a copy of a package.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    settings: AnnotationSettings,
}

impl Annotator {
    pub fn new(settings: AnnotationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnnotationSettings {
        &self.settings
    }

    /// `report.docx` -> `report_annotated.docx` in the same directory.
    pub fn default_destination(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "docx".to_string());
        source.with_file_name(format!(
            "{}{}.{}",
            stem, self.settings.output_suffix, extension
        ))
    }

    pub fn annotate(&self, source: &Path, issues: &[FormatIssue]) -> Result<PathBuf> {
        let destination = self.default_destination(source);
        self.annotate_to(source, issues, &destination)
    }

    /// Annotate into `destination`, which may be `source` itself.
    pub fn annotate_to(
        &self,
        source: &Path,
        issues: &[FormatIssue],
        destination: &Path,
    ) -> Result<PathBuf> {
        if issues.is_empty() {
            return self.pass_through(source, destination);
        }

        let package = OoxmlPackage::open_path(source).stage(Stage::Read)?;
        let plan = self.plan(&package, issues)?;

        let original_digests = if self.settings.verify_passthrough {
            Some(part_digests(source).stage(Stage::Read)?)
        } else {
            None
        };

        let appended = [
            AppendedPart::new(&plan.comments_path, plan.comments_bytes),
            AppendedPart::new(&plan.rels_path, plan.rels_bytes),
        ];
        let main_path = plan.main_path.as_str();
        let mut main_bytes = Some(plan.main_bytes);
        let mut content_types = plan.content_types;

        let summary = PackageRewriter::rewrite_checked(
            source,
            destination,
            |name, _| {
                if name == main_path {
                    return main_bytes.take().map_or(PartAction::Keep, PartAction::Replace);
                }
                if name == CONTENT_TYPES_PATH {
                    if let Some(bytes) = content_types.take() {
                        return PartAction::Replace(bytes);
                    }
                }
                PartAction::Keep
            },
            &appended,
            |written, summary| match &original_digests {
                Some(original) => verify_passthrough(original, written, &summary.kept),
                None => Ok(()),
            },
        )
        .stage(Stage::Rewrite)?;
        debug!(kept = summary.kept.len(), "untouched parts carried over");

        info!(
            destination = %destination.display(),
            comments = plan.comment_count,
            "annotated package written"
        );
        Ok(destination.to_path_buf())
    }

    /// Zero issues: the package is copied unchanged, no comments part added.
    fn pass_through(&self, source: &Path, destination: &Path) -> Result<PathBuf> {
        if source != destination {
            PackageRewriter::rewrite(source, destination, |_, _| PartAction::Keep, &[])
                .stage(Stage::Rewrite)?;
        }
        debug!(destination = %destination.display(), "no issues; package passed through");
        Ok(destination.to_path_buf())
    }

    fn plan(&self, package: &OoxmlPackage, issues: &[FormatIssue]) -> Result<AnnotationPlan> {
        let main_path = package.main_document_path().stage(Stage::Read)?;
        let rels_path = relationships_part_for(&main_path);
        let rels_source = package.get_part(&rels_path);

        let comments_target = match rels_source {
            Some(bytes) => parse_relationships(bytes, &rels_path)
                .stage(Stage::Relationships)?
                .into_iter()
                .find(|r| r.rel_type == relationship_types::COMMENTS)
                .map(|r| r.target),
            None => None,
        }
        .unwrap_or_else(|| DEFAULT_COMMENTS_TARGET.to_string());
        let comments_path = resolve_target(&main_path, &comments_target);

        let main_source = package
            .get_part(&main_path)
            .ok_or_else(|| StyleguardError::MissingPart {
                part_path: main_path.clone(),
            })
            .stage(Stage::Read)?;
        let mut main_doc = parse_part(main_source, &main_path).stage(Stage::Read)?;

        // ids taken by the comments part or by markers in the main part
        let existing_comments = package.get_part(&comments_path);
        let mut used_ids = anchored_comment_ids(&main_doc);
        if let Some(bytes) = existing_comments {
            used_ids.extend(existing_comment_ids(bytes, &comments_path).stage(Stage::Read)?);
        }
        let mut ids = CommentIdCounter::after_existing(used_ids);
        debug!(first_id = ids.peek(), comments_part = %comments_path, "comment ids seeded");

        let records = expand_issues(issues, &mut ids);

        let injection = inject_comments(&mut main_doc, &records).stage(Stage::Annotate)?;
        debug!(
            anchored = injection.anchored,
            fallbacks = injection.fallbacks,
            "comment anchors placed"
        );
        let main_bytes = serialize_bytes(&main_doc).stage(Stage::Annotate)?;

        let comments_bytes =
            build_comments_part(existing_comments, &comments_path, &records, &self.settings)
                .stage(Stage::Annotate)?;

        let rels = ensure_relationship(
            rels_source,
            relationship_types::COMMENTS,
            &comments_target,
            &rels_path,
        )
        .stage(Stage::Relationships)?;

        let content_types_source = package
            .get_part(CONTENT_TYPES_PATH)
            .ok_or_else(|| StyleguardError::MissingPart {
                part_path: CONTENT_TYPES_PATH.to_string(),
            })
            .stage(Stage::Read)?;
        let content_types = ensure_override(
            content_types_source,
            &format!("/{}", comments_path),
            content_type_values::WORD_COMMENTS,
        )
        .stage(Stage::Annotate)?;

        Ok(AnnotationPlan {
            main_path,
            main_bytes,
            comments_path,
            comments_bytes,
            rels_path,
            rels_bytes: rels.bytes,
            content_types,
            comment_count: records.len(),
        })
    }
}

/// Everything the rewrite needs, computed before the archive is touched.
struct AnnotationPlan {
    main_path: String,
    main_bytes: Vec<u8>,
    comments_path: String,
    comments_bytes: Vec<u8>,
    rels_path: String,
    rels_bytes: Vec<u8>,
    content_types: Option<Vec<u8>>,
    comment_count: usize,
}

/// Resolve a relationship target against the directory of `source_part`.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
