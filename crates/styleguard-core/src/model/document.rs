//! Typed view of a WordprocessingML document, as produced by
//! [`crate::wml::reader`]. All lengths are in points.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Body-level paragraphs in document order. Indices into this list are
    /// the paragraph indices the annotator anchors comments on.
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
    pub sections: Vec<Section>,
    pub styles: StyleSet,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub style_id: Option<String>,
    pub alignment: Option<String>,
    pub spacing: Spacing,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn with_alignment(mut self, alignment: &str) -> Self {
        self.alignment = Some(alignment.to_string());
        self
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.text.push_str(&run.text);
        self.runs.push(run);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub before: Option<f64>,
    pub after: Option<f64>,
    /// Multiple of single spacing for `auto` line rules, points otherwise.
    pub line: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub font: RunFont,
}

impl Run {
    pub fn new(text: &str, font: RunFont) -> Self {
        Self {
            text: text.to_string(),
            font,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFont {
    pub name: Option<String>,
    pub size: Option<f64>,
    /// Upper-case hex, `None` for automatic color.
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

impl RunFont {
    pub fn named(name: &str, size: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            size: Some(size),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: usize,
    pub columns: usize,
    pub width: Option<f64>,
    pub alignment: Option<String>,
    pub style_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub page_width: Option<f64>,
    pub page_height: Option<f64>,
    pub margins: Margins,
    pub header_distance: Option<f64>,
    pub footer_distance: Option<f64>,
    pub columns: Option<u32>,
    pub page_numbering: Option<String>,
}

/// Style names by category, in `styles.xml` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub paragraph: Vec<String>,
    pub character: Vec<String>,
    pub table: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub author: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}
