//! # websift
//!
//! A small library for retrieving HTML, XML, and JSON documents from the web
//! and extracting tabular data from them.
//!
//! ## How it works
//!
//! Two components, used independently:
//!
//! - [`fetch()`] issues a single blocking HTTP GET and hands back raw bytes
//!   and a status code.
//! - The extractor parses those bytes into an immutable [`Document`]
//!   (lenient for HTML, strict for XML), applies a reusable
//!   [`TransformTemplate`], and emits a table-shaped output document plus a
//!   sequence of ordered label→value [`Row`]s.
//!
//! Extraction is a pure function of its inputs: the same bytes and template
//! always produce the same rows.
//!
//! ## Quick Start
//!
//! ```
//! use websift::{InputFormat, SelectionPath, TransformTemplate, extract_rows};
//!
//! let template = TransformTemplate::new(SelectionPath::parse("dl")?)
//!     .with_column("dt", SelectionPath::parse("dt")?)
//!     .with_column("dd", SelectionPath::parse("dd")?);
//!
//! let html = b"<dl><dt>order</dt><dd>Sequential numbering</dd></dl>";
//! let rows = extract_rows(html, InputFormat::Html, &template)?;
//!
//! assert_eq!(rows[0].get("dt"), Some("order"));
//! assert_eq!(rows[0].get("dd"), Some("Sequential numbering"));
//! # Ok::<(), websift::Error>(())
//! ```
//!
//! JSON and CSV endpoints have their own loaders ([`json::records`] and
//! [`csv::records`]) that produce ordered records without going through a
//! markup template.

pub mod csv;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod json;
pub mod select;
pub mod table;
pub mod template;
pub mod xml;
pub(crate) mod util;

pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use extract::{InputFormat, extract, extract_rows, parse};
pub use fetch::{Fetched, fetch};
pub use select::SelectionPath;
pub use table::Row;
pub use template::TransformTemplate;
