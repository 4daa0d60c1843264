//! Transform templates.
//!
//! A [`TransformTemplate`] pairs a top-level match path with an ordered list
//! of labelled column paths. It is built once, validated up front, and
//! applied any number of times; applying it never mutates it.

use crate::error::{Error, Result};
use crate::select::SelectionPath;
use crate::xml::parse_xml_str;

/// One output column: a label and the path that selects its values relative
/// to each matched context node.
#[derive(Debug, Clone)]
pub struct Column {
    label: String,
    path: SelectionPath,
}

impl Column {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &SelectionPath {
        &self.path
    }
}

/// A reusable specification mapping matched input nodes to an output table.
///
/// ```
/// use websift::{SelectionPath, TransformTemplate};
///
/// let template = TransformTemplate::new(SelectionPath::parse("dl")?)
///     .with_column("dt", SelectionPath::parse("dt")?)
///     .with_column("dd", SelectionPath::parse("dd")?);
/// assert_eq!(template.columns().len(), 2);
/// # Ok::<(), websift::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TransformTemplate {
    match_path: SelectionPath,
    columns: Vec<Column>,
}

impl TransformTemplate {
    /// Create a template matching context nodes with `match_path`.
    pub fn new(match_path: SelectionPath) -> Self {
        Self {
            match_path,
            columns: Vec::new(),
        }
    }

    /// Add a labelled column, evaluated relative to each context node.
    pub fn with_column(mut self, label: impl Into<String>, path: SelectionPath) -> Self {
        self.columns.push(Column {
            label: label.into(),
            path,
        });
        self
    }

    /// The top-level match path.
    pub fn match_path(&self) -> &SelectionPath {
        &self.match_path
    }

    /// The ordered columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Build a template from its document-shaped XML form:
    ///
    /// ```xml
    /// <table match="dl">
    ///   <column select="dt"/>
    ///   <column select="dd" label="definition"/>
    /// </table>
    /// ```
    ///
    /// The column label defaults to the select expression. Any deviation
    /// from this vocabulary is an [`Error::Template`].
    pub fn from_xml(text: &str) -> Result<Self> {
        let doc = parse_xml_str(text).map_err(|e| match e {
            Error::Parse(msg) => Error::Template(format!("template is not well-formed XML: {msg}")),
            other => other,
        })?;

        let root = doc
            .children(doc.root())
            .find(|&id| doc.is_element(id))
            .ok_or_else(|| Error::Template("template has no root element".into()))?;

        if doc.element_name(root).map(|n| n.as_ref()) != Some("table") {
            return Err(Error::Template(format!(
                "template root must be <table>, found <{}>",
                doc.element_name(root).map(|n| n.as_ref()).unwrap_or("?")
            )));
        }

        let match_expr = doc
            .get_attr(root, "match")
            .ok_or_else(|| Error::Template("<table> is missing the match attribute".into()))?;
        let mut template = TransformTemplate::new(SelectionPath::parse(match_expr)?);

        for child in doc.children(root) {
            if !doc.is_element(child) {
                continue;
            }
            if doc.element_name(child).map(|n| n.as_ref()) != Some("column") {
                return Err(Error::Template(format!(
                    "unexpected element <{}> in template, expected <column>",
                    doc.element_name(child).map(|n| n.as_ref()).unwrap_or("?")
                )));
            }
            let select = doc
                .get_attr(child, "select")
                .ok_or_else(|| Error::Template("<column> is missing the select attribute".into()))?;
            let label = doc.get_attr(child, "label").unwrap_or(select);
            template = template.with_column(label, SelectionPath::parse(select)?);
        }

        if template.columns.is_empty() {
            return Err(Error::Template("template declares no columns".into()));
        }

        Ok(template)
    }
}
