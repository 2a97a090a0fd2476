use super::arena::XmlDocument;
use super::namespaces::{XMLNS_NS, XML_NS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{Result, StyleguardError};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| StyleguardError::XmlWrite(e.to_string()))
}

pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_error)?;

    if let Some(root_id) = doc.root() {
        let mut namespace_map = NamespaceMap::new();
        if let Some(attrs) = doc.get(root_id).and_then(|d| d.attributes()) {
            extend_namespace_map(&mut namespace_map, attrs);
        }
        write_node(doc, root_id, &mut writer, &namespace_map)?;
    }

    Ok(writer.into_inner().into_inner())
}

/// namespace URI -> prefix ("" for the default namespace)
type NamespaceMap = HashMap<String, String>;

fn write_error(e: impl std::fmt::Display) -> StyleguardError {
    StyleguardError::XmlWrite(e.to_string())
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes {
        let Some(ns) = &attr.name.namespace else {
            if attr.name.local_name == "xmlns" {
                namespace_map.entry(attr.value.clone()).or_default();
            }
            continue;
        };

        if ns == XMLNS_NS {
            namespace_map
                .entry(attr.value.clone())
                .or_insert_with(|| attr.name.local_name.clone());
        }
    }
}

fn prefix_for_namespace<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if let Some(prefix) = namespace_map.get(namespace) {
        return prefix.as_str();
    }

    get_prefix(namespace)
}

fn prefix_for_attribute<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if namespace == XMLNS_NS {
        return "xmlns";
    }

    // Unprefixed attributes never take the default namespace.
    if let Some(prefix) = namespace_map.get(namespace) {
        if !prefix.is_empty() {
            return prefix.as_str();
        }
    }

    get_prefix(namespace)
}

fn qualified(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element_with_attrs(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&pi_content)))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

fn write_element_with_attrs<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    let tag_name = match &name.namespace {
        Some(ns) => qualified(prefix_for_namespace(ns, &scoped_map), &name.local_name),
        None => name.local_name.clone(),
    };

    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = match &attr.name.namespace {
            Some(ns) => qualified(prefix_for_attribute(ns, &scoped_map), &attr.name.local_name),
            None => attr.name.local_name.clone(),
        };
        elem.push_attribute((attr_name.as_str(), attr.value.as_str()));
    }

    let mut children = doc.children(node_id).peekable();

    if children.peek().is_none() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}

fn get_prefix(namespace: &str) -> &'static str {
    match namespace {
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main" => "w",
        "http://schemas.microsoft.com/office/word/2010/wordml" => "w14",
        "http://schemas.microsoft.com/office/word/2012/wordml" => "w15",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" => "wp",
        XMLNS_NS => "xmlns",
        XML_NS => "xml",
        _ => "ns",
    }
}
