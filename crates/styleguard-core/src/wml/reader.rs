//! `.docx` -> [`DocumentContent`].
//!
//! Only direct formatting is read: run and paragraph properties written on
//! the element itself. Style inheritance is not resolved.

use super::document::{
    body_paragraphs, body_tables, extract_text, find_document_body, skips_runs, WmlDocument,
};
use crate::error::{Result, StyleguardError};
use crate::model::{
    DocumentContent, DocumentMetadata, Margins, Paragraph, Run, RunFont, Section, Spacing,
    StyleSet, Table,
};
use crate::xml::namespaces::W;
use crate::xml::{XName, XmlDocument};
use indextree::NodeId;
use std::path::Path;
use tracing::debug;

const TWIPS_PER_POINT: f64 = 20.0;
const SINGLE_LINE: f64 = 240.0;

pub fn read_path(path: &Path) -> Result<DocumentContent> {
    read_document(&WmlDocument::open_path(path)?)
}

pub fn read_bytes(bytes: &[u8]) -> Result<DocumentContent> {
    read_document(&WmlDocument::from_bytes(bytes)?)
}

pub fn read_document(wml: &WmlDocument) -> Result<DocumentContent> {
    let main = wml.main_document()?;
    let body = find_document_body(&main)
        .ok_or_else(|| StyleguardError::package("main document part has no w:body"))?;

    let paragraphs: Vec<Paragraph> = body_paragraphs(&main, body)
        .into_iter()
        .map(|p| read_paragraph(&main, p))
        .collect();
    let tables: Vec<Table> = body_tables(&main, body)
        .into_iter()
        .map(|t| read_table(&main, t))
        .collect();
    let sections: Vec<Section> = main
        .descendants_named(body, &W::sectPr())
        .map(|s| read_section(&main, s))
        .collect();

    let styles = match wml.styles()? {
        Some(styles) => read_styles(&styles),
        None => StyleSet::default(),
    };

    let core = wml.core_properties();
    let metadata = DocumentMetadata {
        author: core.creator,
        created: core.created,
        modified: core.modified,
    };

    debug!(
        paragraphs = paragraphs.len(),
        tables = tables.len(),
        sections = sections.len(),
        "document content read"
    );

    Ok(DocumentContent {
        paragraphs,
        tables,
        sections,
        styles,
        metadata,
    })
}

fn read_paragraph(doc: &XmlDocument, paragraph: NodeId) -> Paragraph {
    let properties = doc.first_child_named(paragraph, &W::pPr());

    let style_id = properties.and_then(|p| child_val(doc, p, &W::pStyle()));
    let alignment = properties
        .and_then(|p| child_val(doc, p, &W::jc()))
        .map(|jc| normalize_alignment(&jc));
    let spacing = properties
        .and_then(|p| doc.first_child_named(p, &W::spacing()))
        .map(|s| read_spacing(doc, s))
        .unwrap_or_default();

    let runs: Vec<Run> = paragraph_runs(doc, paragraph)
        .into_iter()
        .filter_map(|r| read_run(doc, r))
        .collect();

    Paragraph {
        text: extract_text(doc, paragraph),
        style_id,
        alignment,
        spacing,
        runs,
    }
}

fn read_spacing(doc: &XmlDocument, spacing: NodeId) -> Spacing {
    let line_rule = doc.attribute(spacing, &W::lineRule()).unwrap_or("auto");
    let line = number_attr(doc, spacing, &W::line()).map(|line| {
        if line_rule == "auto" {
            line / SINGLE_LINE
        } else {
            line / TWIPS_PER_POINT
        }
    });

    Spacing {
        before: twips_attr(doc, spacing, &W::before()),
        after: twips_attr(doc, spacing, &W::after()),
        line,
    }
}

/// Runs of a paragraph in document order, including runs nested in
/// hyperlinks, insertions and similar containers. Deleted or moved-away runs
/// and nested paragraphs are skipped.
fn paragraph_runs(doc: &XmlDocument, paragraph: NodeId) -> Vec<NodeId> {
    let mut runs = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(paragraph).collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        if doc.is_named(node, &W::r()) {
            runs.push(node);
            continue;
        }
        if skips_runs(doc, node) {
            continue;
        }
        let mut children: Vec<NodeId> = doc.children(node).collect();
        children.reverse();
        stack.extend(children);
    }

    runs
}

/// `None` for runs without visible text (comment references, field
/// markers, drawings).
fn read_run(doc: &XmlDocument, run: NodeId) -> Option<Run> {
    let text = extract_text(doc, run);
    if text.is_empty() {
        return None;
    }

    let font = match doc.first_child_named(run, &W::rPr()) {
        Some(properties) => read_run_font(doc, properties, &text),
        None => RunFont::default(),
    };

    Some(Run { text, font })
}

fn read_run_font(doc: &XmlDocument, properties: NodeId, text: &str) -> RunFont {
    let name = doc
        .first_child_named(properties, &W::rFonts())
        .and_then(|fonts| font_name(doc, fonts, text));

    let size = doc
        .first_child_named(properties, &W::sz())
        .and_then(|sz| number_attr(doc, sz, &W::val()))
        .map(|half_points| half_points / 2.0);

    let color = child_val(doc, properties, &W::color())
        .filter(|c| !c.eq_ignore_ascii_case("auto"))
        .map(|c| c.to_ascii_uppercase());

    RunFont {
        name,
        size,
        color,
        bold: toggle(doc, properties, &W::b()),
        italic: toggle(doc, properties, &W::i()),
    }
}

/// East Asian face for CJK text, Latin face otherwise, each falling back to
/// whatever the run declares.
fn font_name(doc: &XmlDocument, fonts: NodeId, text: &str) -> Option<String> {
    let latin = [W::ascii(), W::hAnsi()];
    let east_asian = [W::eastAsia()];
    let order: Vec<&XName> = if text.chars().any(is_cjk) {
        east_asian.iter().chain(latin.iter()).collect()
    } else {
        latin.iter().chain(east_asian.iter()).collect()
    };

    order
        .into_iter()
        .filter_map(|attr| doc.attribute(fonts, attr))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x30FF | 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xAC00..=0xD7AF | 0xF900..=0xFAFF | 0xFF00..=0xFFEF)
}

/// `<w:b/>` and `<w:b w:val="true"/>` are on; `0`, `false` and `off` are off.
fn toggle(doc: &XmlDocument, properties: NodeId, name: &XName) -> bool {
    match doc.first_child_named(properties, name) {
        Some(element) => !matches!(
            doc.attribute(element, &W::val()),
            Some("0") | Some("false") | Some("off")
        ),
        None => false,
    }
}

fn read_table(doc: &XmlDocument, table: NodeId) -> Table {
    let properties = doc.first_child_named(table, &W::tblPr());

    let rows: Vec<NodeId> = doc.elements_by_name(table, &W::tr()).collect();
    let grid_columns = doc
        .first_child_named(table, &W::tblGrid())
        .map(|grid| doc.elements_by_name(grid, &W::gridCol()).count())
        .unwrap_or(0);
    let columns = if grid_columns > 0 {
        grid_columns
    } else {
        rows.iter()
            .map(|&row| doc.elements_by_name(row, &W::tc()).count())
            .max()
            .unwrap_or(0)
    };

    let width = properties
        .and_then(|p| doc.first_child_named(p, &W::tblW()))
        .filter(|w| doc.attribute(*w, &W::type_()).unwrap_or("dxa") == "dxa")
        .and_then(|w| twips_attr(doc, w, &W::w()));

    Table {
        rows: rows.len(),
        columns,
        width,
        alignment: properties
            .and_then(|p| child_val(doc, p, &W::jc()))
            .map(|jc| normalize_alignment(&jc)),
        style_id: properties.and_then(|p| child_val(doc, p, &W::tblStyle())),
    }
}

fn read_section(doc: &XmlDocument, section: NodeId) -> Section {
    let size = doc.first_child_named(section, &W::pgSz());
    let margins = doc.first_child_named(section, &W::pgMar());
    let margin = |name: XName| margins.and_then(|m| twips_attr(doc, m, &name));

    let columns = doc.first_child_named(section, &W::cols()).map(|cols| {
        doc.attribute(cols, &W::num())
            .and_then(|n| n.trim().parse::<u32>().ok())
            .unwrap_or(1)
    });

    Section {
        page_width: size.and_then(|s| twips_attr(doc, s, &W::w())),
        page_height: size.and_then(|s| twips_attr(doc, s, &W::h())),
        margins: Margins {
            top: margin(W::top()),
            bottom: margin(W::bottom()),
            left: margin(W::left()),
            right: margin(W::right()),
        },
        header_distance: margin(W::header()),
        footer_distance: margin(W::footer()),
        columns,
        page_numbering: doc
            .first_child_named(section, &W::pgNumType())
            .and_then(|n| doc.attribute(n, &W::fmt()))
            .map(str::to_string),
    }
}

fn read_styles(styles: &XmlDocument) -> StyleSet {
    let mut set = StyleSet::default();
    let Some(root) = styles.root() else {
        return set;
    };

    for style in styles.elements_by_name(root, &W::style()) {
        let Some(name) = child_val(styles, style, &W::name())
            .or_else(|| styles.attribute(style, &W::styleId()).map(str::to_string))
        else {
            continue;
        };
        match styles.attribute(style, &W::type_()) {
            Some("paragraph") => set.paragraph.push(name),
            Some("character") => set.character.push(name),
            Some("table") => set.table.push(name),
            _ => {}
        }
    }

    set
}

/// `w:jc` values folded onto left/center/right/justify.
fn normalize_alignment(value: &str) -> String {
    match value {
        "start" => "left".to_string(),
        "end" => "right".to_string(),
        "both" | "distribute" => "justify".to_string(),
        other => other.to_string(),
    }
}

fn child_val(doc: &XmlDocument, parent: NodeId, name: &XName) -> Option<String> {
    doc.first_child_named(parent, name)
        .and_then(|child| doc.attribute(child, &W::val()))
        .map(str::to_string)
}

fn number_attr(doc: &XmlDocument, node: NodeId, name: &XName) -> Option<f64> {
    doc.attribute(node, name)?.trim().parse::<f64>().ok()
}

fn twips_attr(doc: &XmlDocument, node: NodeId, name: &XName) -> Option<f64> {
    number_attr(doc, node, name).map(|twips| twips / TWIPS_PER_POINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn read(body: &str) -> DocumentContent {
        let wml = WmlDocument::from_main_xml(document(body).as_bytes(), None).unwrap();
        read_document(&wml).unwrap()
    }

    #[test]
    fn paragraph_properties_in_points() {
        let content = read(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/><w:spacing w:before="240" w:after="120" w:line="360" w:lineRule="auto"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#,
        );

        let paragraph = &content.paragraphs[0];
        assert_eq!(paragraph.text, "Title");
        assert_eq!(paragraph.style_id.as_deref(), Some("Heading1"));
        assert_eq!(paragraph.alignment.as_deref(), Some("center"));
        assert_eq!(
            paragraph.spacing,
            Spacing {
                before: Some(12.0),
                after: Some(6.0),
                line: Some(1.5),
            }
        );
    }

    #[test]
    fn exact_line_spacing_stays_in_points() {
        let content = read(
            r#"<w:p><w:pPr><w:spacing w:line="400" w:lineRule="exact"/></w:pPr></w:p>"#,
        );
        assert_eq!(content.paragraphs[0].spacing.line, Some(20.0));
    }

    #[test]
    fn run_fonts() {
        let content = read(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Times New Roman" w:eastAsia="黑体"/><w:b/><w:i w:val="0"/><w:sz w:val="24"/><w:color w:val="ff0000"/></w:rPr><w:t>标题</w:t></w:r><w:r><w:rPr><w:rFonts w:ascii="Times New Roman" w:eastAsia="黑体"/><w:color w:val="auto"/></w:rPr><w:t>Latin</w:t></w:r></w:p>"#,
        );

        let runs = &content.paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(
            runs[0].font,
            RunFont {
                name: Some("黑体".into()),
                size: Some(12.0),
                color: Some("FF0000".into()),
                bold: true,
                italic: false,
            }
        );
        assert_eq!(runs[1].font.name.as_deref(), Some("Times New Roman"));
        assert_eq!(runs[1].font.color, None);
    }

    #[test]
    fn runs_without_text_are_skipped() {
        let content = read(
            r#"<w:p><w:commentRangeStart w:id="0"/><w:hyperlink><w:r><w:t>link</w:t></w:r></w:hyperlink><w:commentRangeEnd w:id="0"/><w:r><w:commentReference w:id="0"/></w:r><w:del><w:r><w:delText>x</w:delText></w:r></w:del></w:p>"#,
        );
        let runs = &content.paragraphs[0].runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "link");
    }

    #[test]
    fn only_body_level_paragraphs_are_listed() {
        let content = read(
            r#"<w:p/><w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="9000" w:type="dxa"/><w:jc w:val="center"/></w:tblPr><w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid><w:tr><w:tc><w:p/></w:tc></w:tr><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl><w:p/>"#,
        );

        assert_eq!(content.paragraphs.len(), 2);
        assert_eq!(
            content.tables,
            vec![Table {
                rows: 2,
                columns: 3,
                width: Some(450.0),
                alignment: Some("center".into()),
                style_id: Some("TableGrid".into()),
            }]
        );
    }

    #[test]
    fn percentage_table_width_is_unset() {
        let content = read(
            r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/></w:tblPr><w:tr><w:tc/><w:tc/></w:tr></w:tbl>"#,
        );
        assert_eq!(content.tables[0].width, None);
        assert_eq!(content.tables[0].columns, 2);
    }

    #[test]
    fn sections_in_points() {
        let content = read(
            r#"<w:p/><w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:bottom="1440" w:left="1800" w:right="1800" w:header="851" w:footer="992"/><w:cols w:space="425"/><w:pgNumType w:fmt="decimal"/></w:sectPr>"#,
        );

        let section = &content.sections[0];
        assert_eq!(section.page_width, Some(595.3));
        assert_eq!(section.page_height, Some(841.9));
        assert_eq!(section.margins.left, Some(90.0));
        assert_eq!(section.header_distance, Some(42.55));
        assert_eq!(section.columns, Some(1));
        assert_eq!(section.page_numbering.as_deref(), Some("decimal"));
    }

    #[test]
    fn alignment_values_are_normalized() {
        assert_eq!(normalize_alignment("both"), "justify");
        assert_eq!(normalize_alignment("start"), "left");
        assert_eq!(normalize_alignment("center"), "center");
    }

    #[test]
    fn styles_by_category() {
        let styles = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="character" w:styleId="Strong"/><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style><w:style w:type="numbering" w:styleId="NoList"/></w:styles>"#;
        let wml = WmlDocument::from_main_xml(document("<w:p/>").as_bytes(), Some(styles)).unwrap();
        let content = read_document(&wml).unwrap();

        assert_eq!(
            content.styles,
            StyleSet {
                paragraph: vec!["Normal".into()],
                character: vec!["Strong".into()],
                table: vec!["Table Grid".into()],
            }
        );
    }
}
