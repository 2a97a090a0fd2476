use crate::error::Result;
use crate::package::ooxml::{CONTENT_TYPES_PATH, PACKAGE_RELS_PATH};
use crate::package::relationships::{parse_relationships, relationship_types, relationships_part_for};
use crate::package::{CoreProperties, OoxmlPackage};
use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::W;
use crate::xml::node::XmlNodeData;
use indextree::NodeId;
use std::path::Path;

const DEFAULT_STYLES_PART: &str = "word/styles.xml";

/// A `.docx` package with its main document part resolved.
pub struct WmlDocument {
    package: OoxmlPackage,
    main_path: String,
}

impl WmlDocument {
    /// Minimal package around `main_xml`, with an optional styles part.
    pub fn from_main_xml(main_xml: &[u8], styles_xml: Option<&[u8]>) -> Result<Self> {
        let mut package = OoxmlPackage::new();

        let styles_override = if styles_xml.is_some() {
            r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#
        } else {
            ""
        };
        package.set_part(
            CONTENT_TYPES_PATH,
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>{}</Types>"#,
                styles_override
            )
            .into_bytes(),
        );
        package.set_part(
            PACKAGE_RELS_PATH,
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#
                .to_vec(),
        );
        package.set_part("word/document.xml", main_xml.to_vec());

        if let Some(styles) = styles_xml {
            package.set_part(
                "word/_rels/document.xml.rels",
                br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
                    .to_vec(),
            );
            package.set_part(DEFAULT_STYLES_PART, styles.to_vec());
        }

        Self::from_package(package)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(OoxmlPackage::open(bytes)?)
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        Self::from_package(OoxmlPackage::open_path(path)?)
    }

    fn from_package(package: OoxmlPackage) -> Result<Self> {
        let main_path = package.main_document_path()?;
        Ok(Self { package, main_path })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.save()
    }

    pub fn package(&self) -> &OoxmlPackage {
        &self.package
    }

    pub fn main_path(&self) -> &str {
        &self.main_path
    }

    pub fn main_document(&self) -> Result<XmlDocument> {
        self.package.get_xml_part(&self.main_path)
    }

    /// The styles part, found through the main part's relationships and
    /// falling back to `word/styles.xml`.
    pub fn styles(&self) -> Result<Option<XmlDocument>> {
        let rels_path = relationships_part_for(&self.main_path);
        let from_rels = match self.package.get_part(&rels_path) {
            Some(bytes) => parse_relationships(bytes, &rels_path)?
                .into_iter()
                .find(|r| r.rel_type == relationship_types::STYLES)
                .map(|r| sibling_part(&self.main_path, &r.target)),
            None => None,
        };

        let path = from_rels.unwrap_or_else(|| DEFAULT_STYLES_PART.to_string());
        self.package.get_optional_xml_part(&path)
    }

    pub fn core_properties(&self) -> CoreProperties {
        self.package.get_core_properties()
    }
}

fn sibling_part(part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    match part.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, target),
        None => target.to_string(),
    }
}

pub fn find_document_body(doc: &XmlDocument) -> Option<NodeId> {
    let root = doc.root()?;
    doc.first_child_named(root, &W::body())
}

/// Direct `w:p` children of the body. This is the index space paragraph
/// locations and comment anchors refer to.
pub fn body_paragraphs(doc: &XmlDocument, body: NodeId) -> Vec<NodeId> {
    doc.elements_by_name(body, &W::p()).collect()
}

pub fn body_tables(doc: &XmlDocument, body: NodeId) -> Vec<NodeId> {
    doc.elements_by_name(body, &W::tbl()).collect()
}

/// Containers whose runs a paragraph walk leaves alone: nested paragraphs
/// (text boxes) and tracked deletions or moved-away content.
pub fn skips_runs(doc: &XmlDocument, node: NodeId) -> bool {
    doc.is_named(node, &W::p()) || doc.is_named(node, &W::del()) || doc.is_named(node, &W::moveFrom())
}

/// Visible text of a paragraph or run. Deleted text is left out.
pub fn extract_text(doc: &XmlDocument, node: NodeId) -> String {
    let mut texts = Vec::new();
    extract_text_recursive(doc, node, &mut texts);
    texts.concat()
}

fn extract_text_recursive(doc: &XmlDocument, node: NodeId, texts: &mut Vec<String>) {
    let Some(data) = doc.get(node) else { return };

    match data {
        XmlNodeData::Text(text) => texts.push(text.clone()),
        XmlNodeData::Element { name, .. } => {
            if name == &W::del() || name == &W::delText() || name == &W::moveFrom() {
                return;
            }
            if name == &W::t() {
                texts.push(doc.text_of(node));
                return;
            }
            if name == &W::tab() {
                texts.push("\t".to_string());
                return;
            }
            if name == &W::br() {
                texts.push("\n".to_string());
                return;
            }
            // properties never carry visible text
            if name == &W::pPr() || name == &W::rPr() {
                return;
            }
            for child in doc.children(node) {
                extract_text_recursive(doc, child, texts);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello</w:t><w:tab/><w:t xml:space="preserve"> world</w:t></w:r><w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn body_elements_are_direct_children() {
        let wml = WmlDocument::from_main_xml(MAIN.as_bytes(), None).unwrap();
        assert_eq!(wml.main_path(), "word/document.xml");

        let doc = wml.main_document().unwrap();
        let body = find_document_body(&doc).unwrap();
        let paragraphs = body_paragraphs(&doc, body);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(body_tables(&doc, body).len(), 1);
        assert_eq!(extract_text(&doc, paragraphs[0]), "Hello\t world");
    }

    #[test]
    fn styles_resolve_through_relationships() {
        let styles = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        let wml = WmlDocument::from_main_xml(MAIN.as_bytes(), Some(styles)).unwrap();
        assert!(wml.styles().unwrap().is_some());

        let plain = WmlDocument::from_main_xml(MAIN.as_bytes(), None).unwrap();
        assert!(plain.styles().unwrap().is_none());
    }

    #[test]
    fn sibling_targets() {
        assert_eq!(sibling_part("word/document.xml", "styles.xml"), "word/styles.xml");
        assert_eq!(sibling_part("word/document.xml", "/word/s.xml"), "word/s.xml");
    }
}
