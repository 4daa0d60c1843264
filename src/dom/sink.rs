//! html5ever TreeSink implementation that builds a [`Document`].

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::{Attribute, Document, NodeData, NodeId};

/// Handle used by TreeSink to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub NodeId);

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle(NodeId::NONE)
    }
}

/// TreeSink implementation that builds a [`Document`].
///
/// Uses interior mutability (RefCell) because html5ever's TreeSink trait
/// takes `&self` while tree construction has to mutate the arena.
pub struct DomSink {
    doc: RefCell<Document>,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for DomSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSink {
    pub fn new() -> Self {
        Self {
            doc: RefCell::new(Document::new(true)),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    /// Consume the sink and return the finished document.
    pub fn into_document(self) -> Document {
        self.doc.into_inner()
    }
}

impl TreeSink for DomSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Lenient like a browser: malformed markup is repaired, not rejected
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let doc = self.doc.borrow();
        match doc.get(target.0) {
            Some(n) => match &n.data {
                NodeData::Element { name, .. } => {
                    // SAFETY: the QualName is stored in the arena, which lives
                    // as long as self; the RefCell borrow hides that from the
                    // borrow checker. Nodes are never removed from the arena,
                    // so the reference stays valid for 'a.
                    unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
                }
                _ => &EMPTY,
            },
            None => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let converted_attrs: Vec<Attribute> = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();

        let id = self.doc.borrow_mut().create_element(name, converted_attrs);
        NodeHandle(id)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        let id = self.doc.borrow_mut().create_comment(text.to_string());
        NodeHandle(id)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        NodeHandle(self.doc.borrow_mut().create_comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                doc.append(parent.0, node.0);
            }
            NodeOrText::AppendText(text) => {
                doc.append_text(parent.0, &text);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self.doc.borrow().get(element.0).map(|n| n.parent);
        if let Some(parent) = parent
            && parent.is_some()
        {
            let mut doc = self.doc.borrow_mut();
            match child {
                NodeOrText::AppendNode(node) => {
                    doc.append(parent, node.0);
                }
                NodeOrText::AppendText(text) => {
                    doc.append_text(parent, &text);
                }
            }
            return;
        }
        self.append(prev_element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        );
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are not tracked separately
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                doc.insert_before(sibling.0, node.0);
            }
            NodeOrText::AppendText(text) => {
                let text_node = doc.create_text(text.to_string());
                doc.insert_before(sibling.0, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut doc = self.doc.borrow_mut();
        if let Some(node) = doc.get_mut(target.0)
            && let NodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let mut doc = self.doc.borrow_mut();

        let (parent, prev, next) = {
            let node = match doc.get(target.0) {
                Some(n) => n,
                None => return,
            };
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        if prev.is_some() {
            if let Some(p) = doc.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if parent.is_some()
            && let Some(p) = doc.get_mut(parent)
        {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = doc.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if parent.is_some()
            && let Some(p) = doc.get_mut(parent)
        {
            p.last_child = prev;
        }

        if let Some(target_node) = doc.get_mut(target.0) {
            target_node.parent = NodeId::NONE;
            target_node.prev_sibling = NodeId::NONE;
            target_node.next_sibling = NodeId::NONE;
        }
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<_> = self.doc.borrow().children(node.0).collect();

        {
            let mut doc = self.doc.borrow_mut();
            for child in &children {
                if let Some(c) = doc.get_mut(*child) {
                    c.parent = NodeId::NONE;
                    c.prev_sibling = NodeId::NONE;
                    c.next_sibling = NodeId::NONE;
                }
            }

            if let Some(n) = doc.get_mut(node.0) {
                n.first_child = NodeId::NONE;
                n.last_child = NodeId::NONE;
            }
        }

        let mut doc = self.doc.borrow_mut();
        for child in children {
            doc.append(new_parent.0, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use html5ever::driver::ParseOpts;
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;

    use super::*;

    fn parse(html: &str) -> Document {
        let sink = DomSink::new();
        let result = parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes());
        result.into_document()
    }

    #[test]
    fn test_basic_parse() {
        let doc = parse("<html><body><p>Hello</p></body></html>");

        // Document + html + head + body + p + text
        assert!(doc.len() > 3);

        let p = doc.find_by_tag("p").expect("should find p");
        assert_eq!(doc.element_name(p).unwrap().as_ref(), "p");

        let text_id = doc.children(p).next().expect("p should have child");
        assert_eq!(doc.text_content(text_id), Some("Hello"));
    }

    #[test]
    fn test_attributes() {
        let doc = parse(r#"<div id="main" class="container header">Content</div>"#);

        let div = doc.find_by_tag("div").expect("should find div");
        assert_eq!(doc.element_id(div), Some("main"));

        let classes = doc.element_classes(div);
        assert!(classes.contains(&"container".to_string()));
        assert!(classes.contains(&"header".to_string()));
    }

    #[test]
    fn test_unclosed_tags_repaired() {
        // Missing </dt> and </dd>: the tree builder closes them implicitly
        let doc = parse("<dl><dt>order<dd>Sequential numbering</dl>");

        let dl = doc.find_by_tag("dl").expect("should find dl");
        let tags: Vec<_> = doc
            .children(dl)
            .filter_map(|c| doc.element_name(c).map(|n| n.as_ref().to_string()))
            .collect();
        assert_eq!(tags, vec!["dt", "dd"]);
    }

    #[test]
    fn test_entity_decoding() {
        let doc = parse("<p>a &amp; b &#233;</p>");
        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.text_of(p), "a & b é");
    }
}
