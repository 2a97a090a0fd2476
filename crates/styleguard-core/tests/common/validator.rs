//! Structural checks for annotated packages.
//!
//! ## Rules enforced
//!
//! 1. **Required parts**: `[Content_Types].xml` and `_rels/.rels` exist.
//! 2. **Well-formedness**: every `.xml` / `.rels` part parses.
//! 3. **Element ordering**: `w:pPr`, `w:rPr`, `w:tblPr`, `w:trPr` and `w:tcPr`
//!    are the first element child of their container.
//! 4. **Comment anchors**: every id used by `commentRangeStart`,
//!    `commentRangeEnd` and `commentReference` appears exactly once per
//!    marker kind, in that order, and matches one `w:comment`.
//! 5. **Declarations**: a comments part is declared once in the main part's
//!    relationships and has a content-type override.

use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use std::io::Read;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const PR_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const COMMENTS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub error_type: ValidationErrorType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorType {
    InvalidZip,
    MissingPart,
    InvalidXml,
    ElementOrderingViolation,
    CommentAnchorMismatch,
    BrokenDeclaration,
}

fn error(path: &str, message: String, error_type: ValidationErrorType) -> ValidationError {
    ValidationError {
        path: path.to_string(),
        message,
        error_type,
    }
}

/// Every entry of the archive, decompressed.
pub fn read_parts(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| e.to_string())?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        file.read_to_end(&mut content).map_err(|e| e.to_string())?;
        parts.insert(file.name().to_string(), content);
    }
    Ok(parts)
}

pub fn validate_package(bytes: &[u8]) -> ValidationResult {
    let mut errors = Vec::new();

    let parts = match read_parts(bytes) {
        Ok(parts) => parts,
        Err(message) => {
            return ValidationResult {
                is_valid: false,
                errors: vec![error("", format!("Invalid ZIP archive: {}", message), ValidationErrorType::InvalidZip)],
            }
        }
    };

    for required in ["[Content_Types].xml", "_rels/.rels"] {
        if !parts.contains_key(required) {
            errors.push(error(required, format!("Missing {}", required), ValidationErrorType::MissingPart));
        }
    }

    for (name, content) in &parts {
        if !(name.ends_with(".xml") || name.ends_with(".rels")) {
            continue;
        }
        let text = match std::str::from_utf8(content) {
            Ok(text) => text,
            Err(e) => {
                errors.push(error(name, format!("not UTF-8: {}", e), ValidationErrorType::InvalidXml));
                continue;
            }
        };
        match Document::parse(text) {
            Ok(doc) => {
                if name.starts_with("word/") {
                    check_element_ordering(&doc.root(), name, &mut errors);
                }
            }
            Err(e) => errors.push(error(name, format!("XML parse error: {}", e), ValidationErrorType::InvalidXml)),
        }
    }

    if let (Some(document), Some(comments)) = (parts.get("word/document.xml"), parts.get("word/comments.xml")) {
        errors.extend(validate_comment_anchors(
            &String::from_utf8_lossy(document),
            &String::from_utf8_lossy(comments),
        ));
        errors.extend(validate_comment_declarations(&parts));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_element_ordering(node: &Node, part_name: &str, errors: &mut Vec<ValidationError>) {
    if node.is_element() && node.tag_name().namespace() == Some(W_NS) {
        let props = match node.tag_name().name() {
            "p" => Some("pPr"),
            "r" => Some("rPr"),
            "tbl" => Some("tblPr"),
            "tr" => Some("trPr"),
            "tc" => Some("tcPr"),
            _ => None,
        };
        if let Some(props) = props {
            let position = node
                .children()
                .filter(|c| c.is_element())
                .position(|c| c.tag_name().namespace() == Some(W_NS) && c.tag_name().name() == props);
            if let Some(pos) = position.filter(|&p| p != 0) {
                errors.push(error(
                    part_name,
                    format!(
                        "<w:{}> must be the first child of <w:{}> but is at position {}",
                        props,
                        node.tag_name().name(),
                        pos + 1
                    ),
                    ValidationErrorType::ElementOrderingViolation,
                ));
            }
        }
    }

    for child in node.children() {
        check_element_ordering(&child, part_name, errors);
    }
}

/// Marker ids in document order, per marker kind.
pub fn marker_ids(document_xml: &str, local_name: &str) -> Vec<String> {
    let Ok(doc) = Document::parse(document_xml) else {
        return Vec::new();
    };
    doc.descendants()
        .filter(|n| n.has_tag_name((W_NS, local_name)))
        .filter_map(|n| n.attribute((W_NS, "id")).map(str::to_string))
        .collect()
}

pub fn validate_comment_anchors(document_xml: &str, comments_xml: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (Ok(document), Ok(comments)) = (Document::parse(document_xml), Document::parse(comments_xml)) else {
        return vec![error("word/document.xml", "unparseable part".into(), ValidationErrorType::InvalidXml)];
    };

    let comment_ids: Vec<&str> = comments
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((W_NS, "comment")))
        .filter_map(|n| n.attribute((W_NS, "id")))
        .collect();

    // position of each marker kind per id, in document order
    let mut positions: BTreeMap<&str, [Vec<usize>; 3]> = BTreeMap::new();
    for (index, node) in document.descendants().enumerate() {
        let slot = if node.has_tag_name((W_NS, "commentRangeStart")) {
            0
        } else if node.has_tag_name((W_NS, "commentRangeEnd")) {
            1
        } else if node.has_tag_name((W_NS, "commentReference")) {
            2
        } else {
            continue;
        };
        if let Some(id) = node.attribute((W_NS, "id")) {
            positions.entry(id).or_default()[slot].push(index);
        }
    }

    for (id, [starts, ends, references]) in &positions {
        if starts.len() != 1 || ends.len() != 1 || references.len() != 1 {
            errors.push(error(
                "word/document.xml",
                format!(
                    "comment {} has {} starts, {} ends, {} references",
                    id,
                    starts.len(),
                    ends.len(),
                    references.len()
                ),
                ValidationErrorType::CommentAnchorMismatch,
            ));
            continue;
        }
        if !(starts[0] < ends[0] && ends[0] < references[0]) {
            errors.push(error(
                "word/document.xml",
                format!("comment {} markers are out of order", id),
                ValidationErrorType::CommentAnchorMismatch,
            ));
        }
        if !comment_ids.contains(id) {
            errors.push(error(
                "word/comments.xml",
                format!("comment {} is anchored but not defined", id),
                ValidationErrorType::CommentAnchorMismatch,
            ));
        }
    }

    errors
}

fn validate_comment_declarations(parts: &BTreeMap<String, Vec<u8>>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let rels = parts
        .get("word/_rels/document.xml.rels")
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();
    let declared = Document::parse(&rels)
        .map(|doc| {
            doc.descendants()
                .filter(|n| n.has_tag_name((PR_NS, "Relationship")) && n.attribute("Type") == Some(COMMENTS_REL))
                .count()
        })
        .unwrap_or(0);
    if declared != 1 {
        errors.push(error(
            "word/_rels/document.xml.rels",
            format!("comments relationship declared {} times", declared),
            ValidationErrorType::BrokenDeclaration,
        ));
    }

    let types = parts
        .get("[Content_Types].xml")
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();
    let has_override = Document::parse(&types)
        .map(|doc| {
            doc.descendants().any(|n| {
                n.has_tag_name((CT_NS, "Override")) && n.attribute("PartName") == Some("/word/comments.xml")
            })
        })
        .unwrap_or(false);
    if !has_override {
        errors.push(error(
            "[Content_Types].xml",
            "no override for /word/comments.xml".into(),
            ValidationErrorType::BrokenDeclaration,
        ));
    }

    errors
}

/// Panics with every validation error when the package is not valid.
pub fn assert_valid_package(bytes: &[u8], context: &str) {
    let result = validate_package(bytes);
    if !result.is_valid {
        let messages: Vec<_> = result
            .errors
            .iter()
            .map(|e| format!("  - [{:?}] {}: {}", e.error_type, e.path, e.message))
            .collect();
        panic!("package validation failed for {}:\n{}", context, messages.join("\n"));
    }
}
