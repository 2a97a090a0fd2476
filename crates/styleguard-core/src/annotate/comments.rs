//! The comments part (`word/comments.xml`).

use super::record::CommentRecord;
use super::settings::AnnotationSettings;
use crate::error::{Result, StyleguardError};
use crate::xml::builder::serialize_bytes;
use crate::xml::namespaces::{W, XMLNS_NS, XML_NS};
use crate::xml::parser::parse_part;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;

/// Ids of the `w:comment` elements in an existing comments part. Ids that
/// are not non-negative integers are ignored.
pub fn existing_comment_ids(bytes: &[u8], location: &str) -> Result<Vec<u32>> {
    let doc = parse_part(bytes, location)?;
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };

    Ok(doc
        .elements_by_name(root, &W::comment())
        .filter_map(|node| doc.attribute(node, &W::id())?.trim().parse::<u32>().ok())
        .collect())
}

/// Render the comments part: every comment of `existing` in its original
/// order, then one `w:comment` per record.
pub fn build_comments_part(
    existing: Option<&[u8]>,
    location: &str,
    records: &[CommentRecord],
    settings: &AnnotationSettings,
) -> Result<Vec<u8>> {
    let (mut doc, root) = match existing {
        Some(bytes) => {
            let doc = parse_part(bytes, location)?;
            let root = doc
                .root()
                .filter(|&r| doc.is_named(r, &W::comments()))
                .ok_or_else(|| StyleguardError::XmlParse {
                    message: "root element is not w:comments".to_string(),
                    location: location.to_string(),
                })?;
            (doc, root)
        }
        None => {
            let mut doc = XmlDocument::new();
            let root = doc.add_root(XmlNodeData::element_with_attrs(
                W::comments(),
                vec![XAttribute::new(XName::new(XMLNS_NS, "w"), W::NS)],
            ));
            (doc, root)
        }
    };

    let date = settings.comment_date();
    for record in records {
        append_comment(&mut doc, root, record, settings, &date);
    }

    serialize_bytes(&doc)
}

fn append_comment(
    doc: &mut XmlDocument,
    root: NodeId,
    record: &CommentRecord,
    settings: &AnnotationSettings,
    date: &str,
) {
    let comment = doc.add_child(
        root,
        XmlNodeData::element_with_attrs(
            W::comment(),
            vec![
                XAttribute::new(W::id(), &record.id.to_string()),
                XAttribute::new(W::author(), &settings.author),
                XAttribute::new(W::initials(), &settings.initials),
                XAttribute::new(W::date(), date),
            ],
        ),
    );

    let lines: Vec<String> = record
        .body_lines()
        .iter()
        .flat_map(|line| line.lines().map(str::to_string).collect::<Vec<_>>())
        .collect();

    // a comment needs at least one paragraph to carry the annotation mark
    let lines = if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    };

    for (i, line) in lines.iter().enumerate() {
        let paragraph = doc.add_child(comment, XmlNodeData::element(W::p()));
        let properties = doc.add_child(paragraph, XmlNodeData::element(W::pPr()));
        doc.add_child(
            properties,
            XmlNodeData::element_with_attrs(
                W::pStyle(),
                vec![XAttribute::new(W::val(), "CommentText")],
            ),
        );

        if i == 0 {
            let mark = doc.add_child(paragraph, XmlNodeData::element(W::r()));
            let run_properties = doc.add_child(mark, XmlNodeData::element(W::rPr()));
            doc.add_child(
                run_properties,
                XmlNodeData::element_with_attrs(
                    W::rStyle(),
                    vec![XAttribute::new(W::val(), "CommentReference")],
                ),
            );
            doc.add_child(mark, XmlNodeData::element(W::annotationRef()));
        }

        if !line.is_empty() {
            let run = doc.add_child(paragraph, XmlNodeData::element(W::r()));
            let text = doc.add_child(
                run,
                XmlNodeData::element_with_attrs(
                    W::t(),
                    vec![XAttribute::new(XName::new(XML_NS, "space"), "preserve")],
                ),
            );
            doc.add_child(text, XmlNodeData::text(line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::record::Anchor;

    fn record(id: u32, problem: &str) -> CommentRecord {
        CommentRecord {
            id,
            anchor: Anchor::Paragraph(0),
            location: "Paragraph 1".into(),
            problem: problem.into(),
            current_format: String::new(),
            expected_format: "size: 12".into(),
            suggestion: String::new(),
        }
    }

    fn comment_paragraph_texts(xml: &str, id: &str) -> Vec<String> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let comment = doc
            .descendants()
            .find(|n| n.has_tag_name((W::NS, "comment")) && n.attribute((W::NS, "id")) == Some(id))
            .unwrap();
        comment
            .children()
            .filter(|n| n.has_tag_name((W::NS, "p")))
            .map(|p| {
                p.descendants()
                    .filter(|n| n.has_tag_name((W::NS, "t")))
                    .filter_map(|t| t.text())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn new_part_has_one_comment_per_record() {
        let bytes = build_comments_part(
            None,
            "word/comments.xml",
            &[record(0, "a"), record(1, "b")],
            &AnnotationSettings::default(),
        )
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.contains(r#"<w:comment w:id="0" w:author="Styleguard" w:initials="SG" w:date="2024-01-01T00:00:00Z">"#));
        assert_eq!(
            comment_paragraph_texts(&xml, "1"),
            vec!["Location: Paragraph 1", "Problem: b", "Expected: size: 12"]
        );
        assert_eq!(xml.matches("<w:annotationRef/>").count(), 2);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let bytes = build_comments_part(
            None,
            "word/comments.xml",
            &[record(0, r#"<b> & "q" 'a'"#)],
            &AnnotationSettings::default(),
        )
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.contains("Problem: &lt;b&gt; &amp; &quot;q&quot; &apos;a&apos;"));
        assert_eq!(
            comment_paragraph_texts(&xml, "0")[1],
            r#"Problem: <b> & "q" 'a'"#
        );
    }

    #[test]
    fn embedded_newlines_become_paragraphs() {
        let bytes = build_comments_part(
            None,
            "word/comments.xml",
            &[record(0, "line one\nline two")],
            &AnnotationSettings::default(),
        )
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        let texts = comment_paragraph_texts(&xml, "0");
        assert_eq!(texts[1], "Problem: line one");
        assert_eq!(texts[2], "line two");
    }

    #[test]
    fn existing_comments_are_kept_and_ids_read() {
        let existing = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:comment w:id="4" w:author="Reviewer"><w:p><w:r><w:t>keep me</w:t></w:r></w:p></w:comment><w:comment w:id="x"/></w:comments>"#;

        let ids = existing_comment_ids(existing.as_bytes(), "word/comments.xml").unwrap();
        assert_eq!(ids, vec![4]);

        let bytes = build_comments_part(
            Some(existing.as_bytes()),
            "word/comments.xml",
            &[record(5, "new")],
            &AnnotationSettings::default(),
        )
        .unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.contains(r#"<w:comment w:id="4" w:author="Reviewer"><w:p><w:r><w:t>keep me</w:t></w:r></w:p></w:comment>"#));
        let first_new = xml.find(r#"w:id="5""#).unwrap();
        assert!(xml.find(r#"w:id="4""#).unwrap() < first_new);
    }

    #[test]
    fn wrong_root_is_rejected() {
        let result = build_comments_part(
            Some(br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#),
            "word/comments.xml",
            &[],
            &AnnotationSettings::default(),
        );
        assert!(matches!(result, Err(StyleguardError::XmlParse { .. })));
    }
}
