//! Tabular loading: table-shaped documents into ordered rows.

use crate::dom::{Document, NodeId};

/// One extracted record: an ordered mapping from field label to field value.
///
/// Values are plain strings; numeric or date interpretation is left to
/// whatever presents the rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value for the first field with this label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Field labels, in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(l, _)| l.as_str())
    }

    /// Field values, in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    /// (label, value) pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read a table-shaped [`Document`] into rows.
///
/// The first `table` element is used (the whole document when there is
/// none). The first `tr`'s cells, whether `th` or `td`, supply the labels;
/// every later `tr` becomes one row. The label count governs row width:
/// short rows pad with the empty string, long rows truncate.
pub fn rows(doc: &Document) -> Vec<Row> {
    let scope = doc.find_by_tag("table").unwrap_or(doc.root());

    let mut trs = doc
        .descendants(scope)
        .filter(|&id| is_tag(doc, id, "tr"));

    let Some(header_tr) = trs.next() else {
        return Vec::new();
    };
    let labels: Vec<String> = cells(doc, header_tr);
    if labels.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for tr in trs {
        let mut values = cells(doc, tr);
        values.resize(labels.len(), String::new());
        out.push(Row::new(
            labels.iter().cloned().zip(values).collect(),
        ));
    }
    out
}

fn cells(doc: &Document, tr: NodeId) -> Vec<String> {
    doc.children(tr)
        .filter(|&id| is_tag(doc, id, "td") || is_tag(doc, id, "th"))
        .map(|id| doc.text_of(id).trim().to_string())
        .collect()
}

fn is_tag(doc: &Document, id: NodeId, tag: &str) -> bool {
    doc.element_name(id).is_some_and(|n| {
        if doc.is_html() {
            n.as_ref().eq_ignore_ascii_case(tag)
        } else {
            n.as_ref() == tag
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    #[test]
    fn test_rows_from_table() {
        let doc = parse_html(
            b"<table>\
              <tr><th>name</th><th>kind</th></tr>\
              <tr><td>Alberta</td><td>Prov.</td></tr>\
              <tr><td>Yukon</td><td>Terr.</td></tr>\
              </table>",
        );
        let rows = rows(&doc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Alberta"));
        assert_eq!(rows[0].get("kind"), Some("Prov."));
        assert_eq!(rows[1].get("name"), Some("Yukon"));
    }

    #[test]
    fn test_header_only_table_has_no_rows() {
        let doc = parse_html(b"<table><tr><th>a</th></tr></table>");
        assert!(rows(&doc).is_empty());
    }

    #[test]
    fn test_short_rows_pad_long_rows_truncate() {
        let doc = parse_html(
            b"<table>\
              <tr><td>a</td><td>b</td></tr>\
              <tr><td>1</td></tr>\
              <tr><td>2</td><td>3</td><td>4</td></tr>\
              </table>",
        );
        let rows = rows(&doc);
        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1].get("b"), Some("3"));
    }

    #[test]
    fn test_label_order_preserved() {
        let doc = parse_html(
            b"<table><tr><th>z</th><th>a</th></tr><tr><td>1</td><td>2</td></tr></table>",
        );
        let rows = rows(&doc);
        let labels: Vec<_> = rows[0].labels().collect();
        assert_eq!(labels, vec!["z", "a"]);
    }
}
