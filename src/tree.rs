//! Arena-based element tree.
//!
//! All nodes live in a `Vec<NodeData>` owned by the `Document` and are referenced by
//! `NodeId`. Detached nodes stay allocated but become unreachable from the root.
//! Index 0 is the document node, whose single element child is the root element.

use crate::preprocessor::ConditionalTree;

/// A typed index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element { name: String, attributes: Vec<Attribute> },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Creates a document whose root element is named `root_name`.
    pub fn new(root_name: &str) -> Self {
        let mut doc = Document {
            nodes: vec![NodeData { kind: NodeKind::Document, parent: None, children: Vec::new() }],
        };
        let root = doc.create_node(NodeKind::Element { name: root_name.to_string(), attributes: Vec::new() });
        doc.append_child(doc.document_node(), root);
        doc
    }

    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    /// The root element, `None` once it was detached.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.document_node()).find(|&id| self.is_element_node(id))
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element_node(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Element children named `name`.
    pub fn elements_named<'d>(&'d self, id: NodeId, name: &'d str) -> impl Iterator<Item = NodeId> + 'd {
        self.children(id).filter(move |&child| self.node_name(child) == Some(name))
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn get_attribute(&self, id: NodeId, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
            .map(|a| a.value.as_str())
    }

    // --- Mutation ---

    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData { kind, parent: None, children: Vec::new() });
        NodeId(self.nodes.len() - 1)
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if `child` already has a parent. Detach it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.node(child).parent.is_none(), "child already has a parent; detach it first");
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Creates an element and appends it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_node(NodeKind::Element { name: name.to_string(), attributes: Vec::new() });
        self.append_child(parent, id);
        id
    }

    /// Creates a text node and appends it to `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_node(NodeKind::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// Sets an attribute, replacing an existing one with the same namespace and name. Does
    /// nothing for nodes that are not elements.
    pub fn set_attribute(&mut self, id: NodeId, namespace: Option<&str>, name: &str, value: &str) {
        let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind else {
            return;
        };
        match attributes.iter_mut().find(|a| a.name == name && a.namespace.as_deref() == namespace) {
            Some(attribute) => attribute.value = value.to_string(),
            None => attributes.push(Attribute {
                name: name.to_string(),
                namespace: namespace.map(str::to_string),
                value: value.to_string(),
            }),
        }
    }

    pub fn remove_attribute_ns(&mut self, id: NodeId, namespace: Option<&str>, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind {
            attributes.retain(|a| !(a.name == name && a.namespace.as_deref() == namespace));
        }
    }

    /// Detaches a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        self.node_mut(parent).children.retain(|&child| child != id);
        self.node_mut(id).parent = None;
    }

    /// Whether `id` can be reached from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.document_node()
    }

    /// Element and text nodes reachable from the document node, in document order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut pending = vec![self.document_node()];
        while let Some(id) = pending.pop() {
            if id != self.document_node() {
                result.push(id);
            }
            pending.extend(self.node(id).children.iter().rev().copied());
        }
        result
    }
}

impl ConditionalTree for Document {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.is_element_node(node)
    }

    fn attribute(&self, node: NodeId, namespace: &str, name: &str) -> Option<String> {
        self.get_attribute(node, Some(namespace), name).map(str::to_string)
    }

    fn remove_attribute(&mut self, node: NodeId, namespace: &str, name: &str) {
        self.remove_attribute_ns(node, Some(namespace), name)
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn detach(&mut self, node: NodeId) {
        Document::detach(self, node)
    }
}
