use crate::error::{Result, StyleguardError};
use crate::xml::builder::serialize_bytes;
use crate::xml::namespaces::CT;
use crate::xml::parser::parse_part;
use crate::xml::{XAttribute, XName, XmlNodeData};
use std::collections::HashMap;
use tracing::debug;

use super::ooxml::CONTENT_TYPES_PATH;

pub mod content_type_values {
    pub const WORD_DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const WORD_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const WORD_COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

/// Parsed `[Content_Types].xml`. Override keys are part names with the
/// leading slash, as they appear in the file.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = parse_part(bytes, CONTENT_TYPES_PATH)?;
        let mut types = Self::default();
        let Some(root) = doc.root() else {
            return Ok(types);
        };

        for child in doc.children(root) {
            let Some(data) = doc.get(child) else { continue };
            let Some(name) = data.name() else { continue };
            if name.namespace.as_deref() != Some(CT::NS) {
                continue;
            }
            let attr = |local: &str| {
                data.attributes()?
                    .iter()
                    .find(|a| a.name.namespace.is_none() && a.name.local_name == local)
                    .map(|a| a.value.clone())
            };
            match (name.local_name.as_str(), attr("ContentType")) {
                ("Default", Some(ct)) => {
                    if let Some(ext) = attr("Extension") {
                        types.defaults.insert(ext.to_ascii_lowercase(), ct);
                    }
                }
                ("Override", Some(ct)) => {
                    if let Some(part) = attr("PartName") {
                        types.overrides.insert(part, ct);
                    }
                }
                _ => {}
            }
        }

        Ok(types)
    }

    /// Content type for `path` (with or without leading slash).
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let part_name = format!("/{}", path.trim_start_matches('/'));
        if let Some(ct) = self.overrides.get(&part_name) {
            return Some(ct);
        }

        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults.get(&ext).map(String::as_str)
    }

    pub fn has_override(&self, part_name: &str) -> bool {
        self.overrides.contains_key(part_name)
    }
}

/// Add `<Override PartName=.. ContentType=../>` unless the part already has
/// one. Returns `None` when nothing had to change.
pub fn ensure_override(
    existing: &[u8],
    part_name: &str,
    content_type: &str,
) -> Result<Option<Vec<u8>>> {
    if ContentTypes::parse(existing)?.has_override(part_name) {
        return Ok(None);
    }

    let mut doc = parse_part(existing, CONTENT_TYPES_PATH)?;
    let root = doc.root().ok_or_else(|| StyleguardError::XmlParse {
        message: "No root element".to_string(),
        location: CONTENT_TYPES_PATH.to_string(),
    })?;

    doc.add_child(
        root,
        XmlNodeData::element_with_attrs(
            CT::Override(),
            vec![
                XAttribute::new(XName::local("PartName"), part_name),
                XAttribute::new(XName::local("ContentType"), content_type),
            ],
        ),
    );
    debug!(part_name, "added content type override");

    serialize_bytes(&doc).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    #[test]
    fn lookup_prefers_override_over_default() {
        let types = ContentTypes::parse(TYPES.as_bytes()).unwrap();
        assert_eq!(
            types.get_content_type("word/document.xml"),
            Some(content_type_values::WORD_DOCUMENT)
        );
        assert_eq!(types.get_content_type("word/styles.xml"), Some("application/xml"));
        assert_eq!(types.get_content_type("word/media/a.png"), None);
    }

    #[test]
    fn override_is_added_once() {
        let patched = ensure_override(
            TYPES.as_bytes(),
            "/word/comments.xml",
            content_type_values::WORD_COMMENTS,
        )
        .unwrap()
        .unwrap();

        let types = ContentTypes::parse(&patched).unwrap();
        assert_eq!(
            types.get_content_type("/word/comments.xml"),
            Some(content_type_values::WORD_COMMENTS)
        );

        let again = ensure_override(
            &patched,
            "/word/comments.xml",
            content_type_values::WORD_COMMENTS,
        )
        .unwrap();
        assert!(again.is_none());
    }
}
