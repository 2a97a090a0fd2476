//! Shared fixtures: `.docx` packages built in memory and written to a
//! scratch directory.

#![allow(dead_code)]

pub mod validator;

use std::path::{Path, PathBuf};
use styleguard_core::OoxmlPackage;

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

pub const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/></Relationships>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style></w:styles>"#;

/// Stand-in binary part, so pass-through checks cover non-XML content.
pub const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2, 3, 0xff, 0xfe];

/// Body markup for one paragraph.
pub fn paragraph(text: &str, alignment: Option<&str>, font: Option<(&str, u32)>) -> String {
    let properties = alignment
        .map(|a| format!(r#"<w:pPr><w:jc w:val="{}"/></w:pPr>"#, a))
        .unwrap_or_default();
    let run_properties = font
        .map(|(name, half_points)| {
            format!(
                r#"<w:rPr><w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}"/><w:sz w:val="{1}"/></w:rPr>"#,
                name, half_points
            )
        })
        .unwrap_or_default();
    format!(
        r#"<w:p>{}<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        properties, run_properties, text
    )
}

pub fn table(rows: usize, width_twips: u32) -> String {
    let row = r#"<w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr>"#;
    format!(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="{}" w:type="dxa"/></w:tblPr><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>{}</w:tbl>"#,
        width_twips,
        row.repeat(rows)
    )
}

pub const A4_SECTION: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="851" w:footer="992" w:gutter="0"/></w:sectPr>"#;

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
        body
    )
}

/// Builder for a small but complete `.docx`.
pub struct DocxFixture {
    body: String,
    comments: Option<String>,
}

impl DocxFixture {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            comments: None,
        }
    }

    /// Existing comments part. Declared in the rels and content types.
    pub fn with_comments(mut self, comments_xml: &str) -> Self {
        self.comments = Some(comments_xml.to_string());
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut package = OoxmlPackage::new();

        let mut content_types = CONTENT_TYPES.to_string();
        let mut document_rels = DOCUMENT_RELS.to_string();
        if self.comments.is_some() {
            content_types = content_types.replace(
                "</Types>",
                r#"<Override PartName="/word/comments.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml"/></Types>"#,
            );
            document_rels = document_rels.replace(
                "</Relationships>",
                r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="comments.xml"/></Relationships>"#,
            );
        }

        package.set_part("[Content_Types].xml", content_types.into_bytes());
        package.set_part("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec());
        package.set_part("word/document.xml", document_xml(&self.body).into_bytes());
        package.set_part("word/_rels/document.xml.rels", document_rels.into_bytes());
        package.set_part("word/styles.xml", STYLES.as_bytes().to_vec());
        package.set_part("word/media/image1.png", IMAGE.to_vec());
        if let Some(comments) = &self.comments {
            package.set_part("word/comments.xml", comments.as_bytes().to_vec());
        }

        package.save().expect("fixture package saves")
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_bytes()).expect("fixture written");
        path
    }
}

/// The standard three-paragraph report used across suites.
pub fn report_body(title_alignment: &str) -> String {
    [
        paragraph("Annual report", Some(title_alignment), Some(("黑体", 32))),
        paragraph("Body text &amp; more", Some("both"), Some(("宋体", 24))),
        table(2, 8000),
        paragraph("Closing remarks", Some("both"), Some(("宋体", 24))),
        A4_SECTION.to_string(),
    ]
    .concat()
}

pub fn read_part(path: &Path, name: &str) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).ok()?;
    validator::read_parts(&bytes).ok()?.remove(name)
}

pub fn read_part_string(path: &Path, name: &str) -> Option<String> {
    read_part(path, name).map(|b| String::from_utf8_lossy(&b).into_owned())
}
