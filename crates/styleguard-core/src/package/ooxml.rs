use crate::error::{Result, StyleguardError};
use crate::xml::namespaces::{CP, DC, DCTERMS};
use crate::xml::XmlDocument;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::relationships::{parse_relationships, relationship_types};

pub const PACKAGE_RELS_PATH: &str = "_rels/.rels";
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Core document properties extracted from docProps/core.xml
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    /// Original creator of the document (dc:creator)
    pub creator: Option<String>,
    /// Last person who modified the document (cp:lastModifiedBy)
    pub last_modified_by: Option<String>,
    /// dcterms:created
    pub created: Option<String>,
    /// dcterms:modified
    pub modified: Option<String>,
}

/// Fully buffered package. Parts keep their archive order so a saved
/// package lists entries the way the source did.
pub struct OoxmlPackage {
    parts: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl OoxmlPackage {
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn open(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut archive = ZipArchive::new(cursor)?;

        let mut package = Self::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .map_err(|e| StyleguardError::package(format!("cannot read '{}': {}", name, e)))?;
            package.set_part(&name, content);
        }

        Ok(package)
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| StyleguardError::io(path, e))?;
        Self::open(&bytes)
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);

        for (path, content) in &self.parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer.start_file(path.as_str(), options)?;
            writer
                .write_all(content)
                .map_err(|e| StyleguardError::package(format!("cannot write '{}': {}", path, e)))?;
        }

        writer.finish()?;
        Ok(buffer.into_inner())
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.index.get(path).map(|&i| self.parts[i].1.as_slice())
    }

    pub fn has_part(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        let bytes = self.get_part(path).ok_or_else(|| StyleguardError::MissingPart {
            part_path: path.to_string(),
        })?;
        crate::xml::parser::parse_part(bytes, path)
    }

    /// Parse a part that may legitimately be absent.
    pub fn get_optional_xml_part(&self, path: &str) -> Result<Option<XmlDocument>> {
        match self.get_part(path) {
            Some(bytes) => crate::xml::parser::parse_part(bytes, path).map(Some),
            None => Ok(None),
        }
    }

    pub fn set_part(&mut self, path: &str, content: Vec<u8>) {
        match self.index.get(path) {
            Some(&i) => self.parts[i].1 = content,
            None => {
                self.index.insert(path.to_string(), self.parts.len());
                self.parts.push((path.to_string(), content));
            }
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Path of the main document part, resolved through the package-level
    /// `officeDocument` relationship.
    pub fn main_document_path(&self) -> Result<String> {
        if let Some(bytes) = self.get_part(PACKAGE_RELS_PATH) {
            let rels = parse_relationships(bytes, PACKAGE_RELS_PATH)?;
            if let Some(rel) = rels
                .iter()
                .find(|r| r.rel_type == relationship_types::OFFICE_DOCUMENT)
            {
                let target = rel.target.trim_start_matches('/').to_string();
                if self.has_part(&target) {
                    return Ok(target);
                }
            }
        }

        if self.has_part(DEFAULT_MAIN_PART) {
            return Ok(DEFAULT_MAIN_PART.to_string());
        }

        Err(StyleguardError::MissingPart {
            part_path: DEFAULT_MAIN_PART.to_string(),
        })
    }

    /// Extract core document properties from docProps/core.xml
    pub fn get_core_properties(&self) -> CoreProperties {
        let mut props = CoreProperties::default();

        let Ok(Some(core_xml)) = self.get_optional_xml_part("docProps/core.xml") else {
            return props;
        };

        let Some(root) = core_xml.root() else {
            return props;
        };

        fn element_text(doc: &XmlDocument, root: indextree::NodeId, ns: &str, local: &str) -> Option<String> {
            doc.descendants(root)
                .find(|&node| doc.get(node).is_some_and(|d| d.is_named(ns, local)))
                .map(|node| doc.text_of(node).trim().to_string())
                .filter(|text| !text.is_empty())
        }

        props.creator = element_text(&core_xml, root, DC::NS, "creator");
        props.last_modified_by = element_text(&core_xml, root, CP::NS, "lastModifiedBy");
        props.created = element_text(&core_xml, root, DCTERMS::NS, "created");
        props.modified = element_text(&core_xml, root, DCTERMS::NS, "modified");

        props
    }
}

impl Default for OoxmlPackage {
    fn default() -> Self {
        Self::new()
    }
}
