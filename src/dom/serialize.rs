//! Document serialization back to HTML text.

use super::{Document, NodeData, NodeId};

/// Elements that never carry children and self-close on output.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Serialize the whole document to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree.
    pub fn node_to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };

        match &node.data {
            NodeData::Document => {
                for child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Doctype { name, .. } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push_str(">\n");
            }
            NodeData::Comment(_) => {}
            NodeData::Text(text) => {
                out.push_str(&escape_text(text));
            }
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                out.push('<');
                out.push_str(tag);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(attr.name.local.as_ref());
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                if VOID_ELEMENTS.contains(&tag) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
