use super::xname::{XAttribute, XName};

#[derive(Clone, Debug)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(name: XName, attributes: Vec<XAttribute>) -> Self {
        Self::Element { name, attributes }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True for an element named `{namespace}local`.
    pub fn is_named(&self, namespace: &str, local_name: &str) -> bool {
        self.name().is_some_and(|n| n.is(namespace, local_name))
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Value of the attribute `{namespace}local`, if present.
    pub fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes()?
            .iter()
            .find(|a| a.name.is(namespace, local_name))
            .map(|a| a.value.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::CData(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_node_creation() {
        let name = XName::new("http://example.com", "test");
        let node = XmlNodeData::element(name.clone());
        assert!(node.is_element());
        assert_eq!(node.name(), Some(&name));
    }

    #[test]
    fn text_node_creation() {
        let node = XmlNodeData::text("Hello, World!");
        assert!(node.is_text());
        assert_eq!(node.text_content(), Some("Hello, World!"));
    }

    #[test]
    fn attribute_lookup_is_namespace_aware() {
        let node = XmlNodeData::element_with_attrs(
            XName::new("urn:a", "e"),
            vec![
                XAttribute::new(XName::new("urn:a", "val"), "one"),
                XAttribute::new(XName::local("val"), "two"),
            ],
        );
        assert_eq!(node.attribute("urn:a", "val"), Some("one"));
        assert_eq!(node.attribute("urn:b", "val"), None);
        assert!(node.is_named("urn:a", "e"));
    }
}
