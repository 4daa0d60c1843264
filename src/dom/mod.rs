//! Arena-based document tree.
//!
//! Both the HTML and XML parsers build into this arena. Nodes are stored in
//! a contiguous vector and linked by index, which keeps traversal and
//! selector matching cheap. A [`Document`] is treated as immutable once a
//! parser has returned it.

mod serialize;
mod sink;

pub(crate) use sink::DomSink;

use html5ever::{LocalName, QualName};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node variants in the document tree.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast matching.
        id: Option<String>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (kept for completeness, skipped by serialization).
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the document tree.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// An ordered tree of nodes parsed from HTML or XML source bytes.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    /// HTML documents match tag names case-insensitively; XML exactly.
    html: bool,
}

impl Document {
    /// Create an empty document with a root node.
    pub fn new(html: bool) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::NONE,
            html,
        };
        doc.root = doc.alloc(Node::new(NodeData::Document));
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether this document was parsed as HTML.
    pub fn is_html(&self) -> bool {
        self.html
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        // Pre-extract id and class so selector matching never rescans attrs
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name.local.as_ref() == "id" {
                id = Some(attr.value.clone());
            } else if attr.name.local.as_ref() == "class" {
                classes = attr
                    .value
                    .split_whitespace()
                    .map(|s| s.to_string())
                    .collect();
            }
        }

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document is empty (only has the root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children {
            doc: self,
            current: first,
        }
    }

    /// Iterate over all nodes below `root` in document order (depth-first,
    /// pre-order). The root itself is not yielded.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let first = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants {
            doc: self,
            root,
            next: first,
        }
    }

    /// Concatenated text of all descendant text nodes, in document order.
    ///
    /// No whitespace normalization happens here; callers trim the result if
    /// they need a field value.
    pub fn text_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.get(id)
            && let NodeData::Text(s) = &node.data
        {
            out.push_str(s);
        }
        for child in self.descendants(id) {
            if let Some(NodeData::Text(s)) = self.get(child).map(|n| &n.data) {
                out.push_str(s);
            }
        }
        out
    }

    /// Find the first element with the given tag name (document order).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root).find(|&id| {
            self.element_name(id).is_some_and(|n| {
                if self.html {
                    n.as_ref().eq_ignore_ascii_case(tag)
                } else {
                    n.as_ref() == tag
                }
            })
        })
    }
}

/// Iterator over children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .doc
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Pre-order walker over the subtree below a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_none() {
            return None;
        }
        let id = self.next;

        // Advance: first child, else next sibling, else climb until a
        // sibling exists or we are back at the subtree root.
        let node = self.doc.get(id)?;
        if node.first_child.is_some() {
            self.next = node.first_child;
        } else {
            let mut current = id;
            self.next = NodeId::NONE;
            loop {
                if current == self.root {
                    break;
                }
                let Some(n) = self.doc.get(current) else { break };
                if n.next_sibling.is_some() {
                    self.next = n.next_sibling;
                    break;
                }
                current = n.parent;
            }
        }

        Some(id)
    }
}

/// Convenience accessors for element nodes.
impl Document {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn make_qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    #[test]
    fn test_create_elements() {
        let mut doc = Document::new(true);

        let div = doc.create_element(
            make_qname("div"),
            vec![Attribute {
                name: make_qname("id"),
                value: "main".to_string(),
            }],
        );

        doc.append(doc.root(), div);

        assert_eq!(doc.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(doc.element_id(div), Some("main"));
    }

    #[test]
    fn test_append_children() {
        let mut doc = Document::new(true);

        let parent = doc.create_element(make_qname("div"), vec![]);
        let child1 = doc.create_element(make_qname("p"), vec![]);
        let child2 = doc.create_element(make_qname("p"), vec![]);

        doc.append(doc.root(), parent);
        doc.append(parent, child1);
        doc.append(parent, child2);

        let children: Vec<_> = doc.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut doc = Document::new(true);

        let p = doc.create_element(make_qname("p"), vec![]);
        doc.append(doc.root(), p);

        doc.append_text(p, "Hello, ");
        doc.append_text(p, "World!");

        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text_content(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut doc = Document::new(true);

        let div = doc.create_element(make_qname("div"), vec![]);
        let p1 = doc.create_element(make_qname("p"), vec![]);
        let b = doc.create_element(make_qname("b"), vec![]);
        let p2 = doc.create_element(make_qname("p"), vec![]);

        doc.append(doc.root(), div);
        doc.append(div, p1);
        doc.append(p1, b);
        doc.append(div, p2);

        let order: Vec<_> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![div, p1, b, p2]);

        // Scoped walk stays inside the subtree
        let order: Vec<_> = doc.descendants(p1).collect();
        assert_eq!(order, vec![b]);
    }

    #[test]
    fn test_text_of() {
        let mut doc = Document::new(true);

        let td = doc.create_element(make_qname("td"), vec![]);
        let b = doc.create_element(make_qname("b"), vec![]);
        doc.append(doc.root(), td);
        doc.append_text(td, "  Alberta ");
        doc.append(td, b);
        doc.append_text(b, "Prov.");
        doc.append_text(td, "  ");

        assert_eq!(doc.text_of(td), "  Alberta Prov.  ");
        assert_eq!(doc.text_of(td).trim(), "Alberta Prov.");
    }
}
