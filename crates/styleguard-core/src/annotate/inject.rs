//! Splicing comment anchors into the main document tree.
//!
//! Each record becomes `w:commentRangeStart`, `w:commentRangeEnd` and a
//! `w:r/w:commentReference` sharing its id. Targets are the body-level
//! paragraphs and tables, collected once; arena node ids stay valid across
//! insertions.

use super::record::{Anchor, CommentRecord};
use crate::error::{Result, StyleguardError};
use crate::wml::document::{body_paragraphs, body_tables, find_document_body, skips_runs};
use crate::xml::namespaces::W;
use crate::xml::{XAttribute, XmlDocument, XmlNodeData};
use indextree::NodeId;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionSummary {
    /// Records placed on the element they asked for.
    pub anchored: usize,
    /// Records redirected to the first paragraph or the document end.
    pub fallbacks: usize,
}

/// Where one record ends up.
enum Target {
    /// Range spans `first..=last` run.
    Span { first: NodeId, last: NodeId },
    /// No runs: markers are appended inside this paragraph.
    Empty(NodeId),
}

pub fn inject_comments(doc: &mut XmlDocument, records: &[CommentRecord]) -> Result<InjectionSummary> {
    let body = find_document_body(doc)
        .ok_or_else(|| StyleguardError::package("main document part has no w:body"))?;

    let paragraphs = body_paragraphs(doc, body);
    let tables = body_tables(doc, body);

    let mut summary = InjectionSummary::default();
    let mut end_paragraph: Option<NodeId> = None;

    for record in records {
        let resolved = match record.anchor {
            Anchor::Paragraph(index) => paragraphs.get(index).map(|&p| paragraph_target(doc, p)),
            Anchor::Table(index) => tables.get(index).and_then(|&t| table_target(doc, t)),
        };

        let target = match resolved {
            Some(target) => {
                summary.anchored += 1;
                target
            }
            None => {
                summary.fallbacks += 1;
                match paragraphs.first() {
                    Some(&first) => paragraph_target(doc, first),
                    None => {
                        let paragraph = match end_paragraph {
                            Some(p) => p,
                            None => {
                                let p = append_body_paragraph(doc, body);
                                end_paragraph = Some(p);
                                p
                            }
                        };
                        Target::Empty(paragraph)
                    }
                }
            }
        };

        place_markers(doc, target, record.id);
        debug!(id = record.id, anchor = ?record.anchor, "comment anchored");
    }

    Ok(summary)
}

/// Ids already used by comment markers in the main part, including ranges
/// whose comment is missing from the comments part.
pub fn anchored_comment_ids(doc: &XmlDocument) -> Vec<u32> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };
    let markers = [
        W::commentRangeStart(),
        W::commentRangeEnd(),
        W::commentReference(),
    ];

    doc.descendants(root)
        .filter(|&node| markers.iter().any(|name| doc.is_named(node, name)))
        .filter_map(|node| doc.attribute(node, &W::id())?.trim().parse::<u32>().ok())
        .collect()
}

fn paragraph_target(doc: &XmlDocument, paragraph: NodeId) -> Target {
    let runs = content_runs(doc, paragraph);
    match (runs.first(), runs.last()) {
        (Some(&first), Some(&last)) => Target::Span { first, last },
        _ => Target::Empty(paragraph),
    }
}

/// From the first run of the table's first paragraph to the last run of its
/// last paragraph. `None` for a table without paragraphs.
fn table_target(doc: &XmlDocument, table: NodeId) -> Option<Target> {
    let paragraphs: Vec<NodeId> = doc.descendants_named(table, &W::p()).collect();
    let first_paragraph = *paragraphs.first()?;

    let runs: Vec<NodeId> = paragraphs
        .iter()
        .flat_map(|&p| content_runs(doc, p))
        .collect();

    Some(match (runs.first(), runs.last()) {
        (Some(&first), Some(&last)) => Target::Span { first, last },
        _ => Target::Empty(first_paragraph),
    })
}

/// The paragraph's `w:r` elements in document order, without looking inside
/// runs and without the reference runs earlier comments added.
fn content_runs(doc: &XmlDocument, paragraph: NodeId) -> Vec<NodeId> {
    let mut runs = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(paragraph).collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        if doc.is_named(node, &W::r()) {
            if !is_reference_run(doc, node) {
                runs.push(node);
            }
            continue;
        }
        // nested paragraphs belong to their own anchors; deleted and
        // moved-away content must not carry the reference
        if skips_runs(doc, node) {
            continue;
        }
        let mut children: Vec<NodeId> = doc.children(node).collect();
        children.reverse();
        stack.extend(children);
    }

    runs
}

fn is_reference_run(doc: &XmlDocument, run: NodeId) -> bool {
    doc.children(run)
        .any(|child| doc.is_named(child, &W::commentReference()))
}

fn place_markers(doc: &mut XmlDocument, target: Target, id: u32) {
    let id = id.to_string();
    match target {
        Target::Span { first, last } => {
            doc.add_before(first, marker(W::commentRangeStart(), &id));
            let end = doc.add_after(last, marker(W::commentRangeEnd(), &id));
            let reference = doc.add_after(end, XmlNodeData::element(W::r()));
            doc.add_child(reference, marker(W::commentReference(), &id));
        }
        Target::Empty(paragraph) => {
            doc.add_child(paragraph, marker(W::commentRangeStart(), &id));
            doc.add_child(paragraph, marker(W::commentRangeEnd(), &id));
            let reference = doc.add_child(paragraph, XmlNodeData::element(W::r()));
            doc.add_child(reference, marker(W::commentReference(), &id));
        }
    }
}

fn marker(name: crate::xml::XName, id: &str) -> XmlNodeData {
    XmlNodeData::element_with_attrs(name, vec![XAttribute::new(W::id(), id)])
}

/// New empty paragraph before the body's trailing `w:sectPr`, or at the end.
fn append_body_paragraph(doc: &mut XmlDocument, body: NodeId) -> NodeId {
    let trailing_section = doc
        .children(body)
        .last()
        .filter(|&n| doc.is_named(n, &W::sectPr()));

    match trailing_section {
        Some(section) => doc.add_before(section, XmlNodeData::element(W::p())),
        None => doc.add_child(body, XmlNodeData::element(W::p())),
    }
}
