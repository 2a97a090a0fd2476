use super::node::XmlNodeData;
use super::xname::XName;
use indextree::{Arena, NodeId};

/// XML tree stored in an arena. Node ids stay valid across insertions, so
/// callers can collect targets once and splice around them afterwards.
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn add_before(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_before(new_node, &mut self.arena);
        new_node
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// The node itself followed by all of its descendants, document order.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn is_named(&self, node: NodeId, name: &XName) -> bool {
        self.get(node)
            .and_then(|data| data.name())
            .is_some_and(|n| n == name)
    }

    pub fn elements_by_name<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&child_id| self.is_named(child_id, name))
    }

    pub fn first_child_named(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.elements_by_name(parent, name).next()
    }

    /// Descendants (excluding `node`) with the given name.
    pub fn descendants_named<'a>(
        &'a self,
        node: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(node)
            .skip(1)
            .filter(move |&id| self.is_named(id, name))
    }

    /// Attribute value of an element node.
    pub fn attribute(&self, node: NodeId, name: &XName) -> Option<&str> {
        self.get(node)?
            .attributes()?
            .iter()
            .find(|a| &a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_of(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|id| self.get(id).and_then(|d| d.text_content()))
            .collect()
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_document_with_root() {
        let mut doc = XmlDocument::new();
        let root_name = XName::new("http://example.com", "root");
        let root_id = doc.add_root(XmlNodeData::element(root_name.clone()));

        assert_eq!(doc.root(), Some(root_id));
        assert_eq!(doc.get(root_id).and_then(|d| d.name()), Some(&root_name));
    }

    #[test]
    fn add_before_and_after_keep_sibling_order() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(XName::local("root")));
        let middle = doc.add_child(root, XmlNodeData::element(XName::local("middle")));
        doc.add_before(middle, XmlNodeData::element(XName::local("first")));
        doc.add_after(middle, XmlNodeData::element(XName::local("last")));

        let names: Vec<_> = doc
            .children(root)
            .filter_map(|id| doc.get(id).and_then(|d| d.name()).map(|n| n.local_name.clone()))
            .collect();
        assert_eq!(names, vec!["first", "middle", "last"]);
    }

    #[test]
    fn descendants_named_skips_the_start_node() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(XName::local("p")));
        let inner = doc.add_child(root, XmlNodeData::element(XName::local("p")));
        doc.add_child(inner, XmlNodeData::text("x"));

        let p = XName::local("p");
        let found: Vec<_> = doc.descendants_named(root, &p).collect();
        assert_eq!(found, vec![inner]);
        assert_eq!(doc.text_of(root), "x");
    }
}
