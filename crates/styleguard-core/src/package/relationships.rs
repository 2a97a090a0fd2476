//! Relationship parts (`*.rels`) and the merge that declares the comments
//! part on the main document.

use crate::error::{Result, StyleguardError};
use crate::xml::builder::serialize_bytes;
use crate::xml::namespaces::PR;
use crate::xml::parser::parse_part;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const COMMENTS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
}

/// Minimal valid relationship index, used when a part has none yet.
pub const EMPTY_RELATIONSHIPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#
);

/// `word/document.xml` -> `word/_rels/document.xml.rels`
pub fn relationships_part_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

pub fn parse_relationships(bytes: &[u8], location: &str) -> Result<Vec<Relationship>> {
    let doc = parse_part(bytes, location)?;
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };

    let rels = doc
        .elements_by_name(root, &PR::Relationship())
        .filter_map(|node| {
            let data = doc.get(node)?;
            let attr = |local: &str| {
                data.attributes()?
                    .iter()
                    .find(|a| a.name.namespace.is_none() && a.name.local_name == local)
                    .map(|a| a.value.clone())
            };
            Some(Relationship {
                id: attr("Id")?,
                rel_type: attr("Type")?,
                target: attr("Target").unwrap_or_default(),
                target_mode: match attr("TargetMode").as_deref() {
                    Some("External") => TargetMode::External,
                    _ => TargetMode::Internal,
                },
            })
        })
        .collect();

    Ok(rels)
}

/// Result of [`ensure_relationship`].
#[derive(Debug, Clone)]
pub struct RelationshipMerge {
    /// Serialized relationship part.
    pub bytes: Vec<u8>,
    /// Id of the relationship that was appended, if one was needed.
    pub added: Option<String>,
}

/// Make sure the relationship index declares a relationship of `rel_type`.
/// An existing declaration leaves the part untouched; otherwise a new
/// `Relationship` with the next free `rIdN` becomes the last child of the
/// root. A missing part (`existing == None`) starts from an empty index.
pub fn ensure_relationship(
    existing: Option<&[u8]>,
    rel_type: &str,
    target: &str,
    location: &str,
) -> Result<RelationshipMerge> {
    let source = existing.unwrap_or(EMPTY_RELATIONSHIPS.as_bytes());
    let mut doc = parse_part(source, location)?;
    let root = doc.root().ok_or_else(|| StyleguardError::XmlParse {
        message: "No root element".to_string(),
        location: location.to_string(),
    })?;

    let current = parse_relationships(source, location)?;
    if current.iter().any(|r| r.rel_type == rel_type) {
        debug!(part = location, rel_type, "relationship already declared");
        return Ok(RelationshipMerge {
            bytes: source.to_vec(),
            added: None,
        });
    }

    let id = next_relationship_id(&current);
    append_relationship(&mut doc, root, &id, rel_type, target);
    debug!(part = location, id = %id, target, "appended relationship");

    Ok(RelationshipMerge {
        bytes: serialize_bytes(&doc)?,
        added: Some(id),
    })
}

fn next_relationship_id(current: &[Relationship]) -> String {
    let taken: HashSet<&str> = current.iter().map(|r| r.id.as_str()).collect();
    let max_numeric = current
        .iter()
        .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    let mut next = max_numeric + 1;
    loop {
        let candidate = format!("rId{}", next);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        next += 1;
    }
}

fn append_relationship(
    doc: &mut XmlDocument,
    root: indextree::NodeId,
    id: &str,
    rel_type: &str,
    target: &str,
) {
    let attrs = vec![
        XAttribute::new(XName::local("Id"), id),
        XAttribute::new(XName::local("Type"), rel_type),
        XAttribute::new(XName::local("Target"), target),
    ];
    doc.add_child(
        root,
        XmlNodeData::element_with_attrs(PR::Relationship(), attrs),
    );
}
