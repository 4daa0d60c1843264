//! The parse → transform pipeline.
//!
//! [`extract`] turns raw markup bytes into a table-shaped output
//! [`Document`]: the template's match path selects context nodes, each
//! column path is evaluated inside its context, and the collected cell
//! values are assembled into `<table>`/`<tr>`/`<td>` output. The whole
//! pipeline is a pure function of its inputs.

use html5ever::{LocalName, QualName, ns};

use crate::dom::Document;
use crate::error::Result;
use crate::html::parse_html;
use crate::table::Row;
use crate::template::TransformTemplate;
use crate::xml::parse_xml;

/// Markup flavor of the input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Lenient parsing with browser-style repair of malformed markup.
    Html,
    /// Strict parsing; malformed input is a parse error.
    Xml,
}

/// Parse raw bytes into a [`Document`] according to `format`.
pub fn parse(bytes: &[u8], format: InputFormat) -> Result<Document> {
    match format {
        InputFormat::Html => Ok(parse_html(bytes)),
        InputFormat::Xml => parse_xml(bytes),
    }
}

/// Apply `template` to the parsed input and return the table-shaped output
/// document: one header `<tr>` of `<th>` labels, then one `<tr>` of `<td>`
/// cells per emitted row.
///
/// Zero context matches produce a header-only table, not an error.
pub fn extract(bytes: &[u8], format: InputFormat, template: &TransformTemplate) -> Result<Document> {
    let doc = parse(bytes, format)?;

    let contexts = template.match_path().select_root(&doc);

    let mut out = Document::new(true);
    let table = out.create_element(qname("table"), vec![]);
    let out_root = out.root();
    out.append(out_root, table);

    let header = out.create_element(qname("tr"), vec![]);
    out.append(table, header);
    for column in template.columns() {
        let th = out.create_element(qname("th"), vec![]);
        out.append(header, th);
        out.append_text(th, column.label());
    }

    let mut emitted = 0usize;
    for &context in &contexts {
        // Per-column value sequences, scoped to this context's descendants
        let values: Vec<Vec<String>> = template
            .columns()
            .iter()
            .map(|column| {
                column
                    .path()
                    .select(&doc, context)
                    .iter()
                    .map(|&id| doc.text_of(id).trim().to_string())
                    .collect()
            })
            .collect();

        // Zip positionally; exhausted columns pad with the empty string
        let row_count = values.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..row_count {
            let tr = out.create_element(qname("tr"), vec![]);
            out.append(table, tr);
            for column_values in &values {
                let td = out.create_element(qname("td"), vec![]);
                out.append(tr, td);
                if let Some(value) = column_values.get(i) {
                    out.append_text(td, value);
                }
            }
        }
        emitted += row_count;
    }

    tracing::debug!(
        contexts = contexts.len(),
        rows = emitted,
        columns = template.columns().len(),
        "extract"
    );

    Ok(out)
}

/// [`extract`] followed by the tabular loader: returns the emitted rows as
/// ordered label→value records.
pub fn extract_rows(
    bytes: &[u8],
    format: InputFormat,
    template: &TransformTemplate,
) -> Result<Vec<Row>> {
    let out = extract(bytes, format, template)?;
    Ok(crate::table::rows(&out))
}

fn qname(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}
