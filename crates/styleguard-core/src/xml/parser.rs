use super::arena::XmlDocument;
use super::namespaces::{XMLNS_NS, XML_NS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{Result, StyleguardError};

pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_part(xml.as_bytes(), "input")
}

/// Parse one package part; `location` names the part in error messages.
pub fn parse_part(bytes: &[u8], location: &str) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| StyleguardError::XmlParse {
        message: e.to_string(),
        location: location.to_string(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let doc = roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| StyleguardError::XmlParse {
        message: e.to_string(),
        location: format!("{} line {}", location, e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    build_tree(doc.root_element(), &mut xml_doc, None);
    Ok(xml_doc)
}

fn build_tree(node: roxmltree::Node, doc: &mut XmlDocument, parent: Option<indextree::NodeId>) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = XName::new(
                node.tag_name().namespace().unwrap_or(""),
                node.tag_name().name(),
            );

            let mut attributes: Vec<XAttribute> = node
                .attributes()
                .map(|attr| {
                    XAttribute::new(
                        XName::new(attr.namespace().unwrap_or(""), attr.name()),
                        attr.value(),
                    )
                })
                .collect();

            // roxmltree reports every in-scope namespace on every element;
            // keep only the declarations this element introduces.
            let parent_element = node.parent_element();
            for ns in node.namespaces() {
                if ns.uri() == XML_NS {
                    continue;
                }
                let inherited = parent_element.is_some_and(|p| {
                    p.namespaces()
                        .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
                });
                if inherited {
                    continue;
                }
                match ns.name() {
                    Some(prefix) => attributes.push(XAttribute::new(
                        XName::new(XMLNS_NS, prefix),
                        ns.uri(),
                    )),
                    None => attributes.push(XAttribute::new(XName::local("xmlns"), ns.uri())),
                }
            }

            XmlNodeData::Element { name, attributes }
        }
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => XmlNodeData::ProcessingInstruction {
            target: node.pi().map(|pi| pi.target.to_string()).unwrap_or_default(),
            data: node
                .pi()
                .and_then(|pi| pi.value.map(|s| s.to_string()))
                .unwrap_or_default(),
        },
        _ => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}
