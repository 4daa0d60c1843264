//! Declarative selection paths.
//!
//! A [`SelectionPath`] locates elements in a [`Document`] by tag name and
//! structural relationship: whitespace for descendant-at-any-depth, `>` for
//! direct child. Evaluation is always scoped to a context node and returns
//! matches in document order. Zero matches is a normal, empty result.

mod element;

pub(crate) use element::ElementRef;
pub use element::SiftSelectors;

use selectors::context::{MatchingContext, QuirksMode, SelectorCaches};
use selectors::matching::{self, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags};
use selectors::parser::Selector;

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};

/// A parsed, reusable path expression.
///
/// Parsing happens once, up front, so a malformed path surfaces as
/// [`Error::Template`] before any document is fetched or parsed. The parsed
/// form is cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct SelectionPath {
    source: String,
    selector: Selector<SiftSelectors>,
}

impl SelectionPath {
    /// Parse a path expression.
    ///
    /// ```
    /// use websift::SelectionPath;
    ///
    /// let path = SelectionPath::parse("table > tr")?;
    /// assert_eq!(path.as_str(), "table > tr");
    /// assert!(SelectionPath::parse("p >> q").is_err());
    /// # Ok::<(), websift::Error>(())
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser_input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut parser_input);
        let selector = Selector::parse(&SiftSelectors, &mut parser)
            .map_err(|e| Error::Template(format!("invalid selection path {source:?}: {e:?}")))?;
        parser.expect_exhausted().map_err(|_| {
            Error::Template(format!(
                "invalid selection path {source:?}: trailing input"
            ))
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    /// The original path text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate this path against the descendants of `context`, in document
    /// order. The context node itself is never part of the result, and
    /// matching cannot escape the context's subtree.
    pub fn select(&self, doc: &Document, context: NodeId) -> Vec<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut ctx = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        let mut out = Vec::new();
        for id in doc.descendants(context) {
            if !doc.is_element(id) {
                continue;
            }
            let elem = ElementRef::new(doc, id, context);
            if matching::matches_selector(&self.selector, 0, None, &elem, &mut ctx) {
                out.push(id);
            }
        }
        out
    }

    /// Evaluate this path against the whole document.
    pub fn select_root(&self, doc: &Document) -> Vec<NodeId> {
        self.select(doc, doc.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use crate::xml::parse_xml;

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SelectionPath::parse("dt").is_ok());
        assert!(SelectionPath::parse("dl > dt").is_ok());
        assert!(SelectionPath::parse("").is_err());
        assert!(SelectionPath::parse(">>").is_err());
        assert!(SelectionPath::parse("p ~~ q").is_err());
        assert!(SelectionPath::parse("p:hover").is_err());
    }

    #[test]
    fn test_select_document_order() {
        let doc = parse_html(b"<ul><li>1</li><li>2</li></ul><ol><li>3</li></ol>");
        let path = SelectionPath::parse("li").unwrap();
        let hits = path.select_root(&doc);
        let texts: Vec<_> = hits.iter().map(|&id| doc.text_of(id)).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_direct_child_vs_descendant() {
        let doc = parse_html(b"<div><span><p>nested</p></span><p>direct</p></div>");
        let direct = SelectionPath::parse("div > p").unwrap();
        let any = SelectionPath::parse("div p").unwrap();

        let hits: Vec<_> = direct
            .select_root(&doc)
            .iter()
            .map(|&id| doc.text_of(id))
            .collect();
        assert_eq!(hits, vec!["direct"]);

        let hits: Vec<_> = any
            .select_root(&doc)
            .iter()
            .map(|&id| doc.text_of(id))
            .collect();
        assert_eq!(hits, vec!["nested", "direct"]);
    }

    #[test]
    fn test_scoped_matching_stops_at_context() {
        let doc = parse_html(b"<div class=\"outer\"><div class=\"inner\"><p>x</p></div></div>");
        let inner = SelectionPath::parse(".inner").unwrap().select_root(&doc)[0];

        // Relative to the inner div, the outer ancestor is invisible
        let path = SelectionPath::parse(".outer p").unwrap();
        assert!(path.select(&doc, inner).is_empty());

        let path = SelectionPath::parse("p").unwrap();
        assert_eq!(path.select(&doc, inner).len(), 1);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let doc = parse_html(b"<p>no tables here</p>");
        let path = SelectionPath::parse("table td").unwrap();
        assert!(path.select_root(&doc).is_empty());
    }

    #[test]
    fn test_html_tags_match_case_insensitively() {
        let doc = parse_html(b"<DIV>x</DIV>");
        let path = SelectionPath::parse("div").unwrap();
        assert_eq!(path.select_root(&doc).len(), 1);
    }

    #[test]
    fn test_xml_tags_match_case_sensitively() {
        let doc = parse_xml(b"<root><DT>x</DT><dt>y</dt></root>").unwrap();
        let upper = SelectionPath::parse("DT").unwrap();
        let lower = SelectionPath::parse("dt").unwrap();

        let hits: Vec<_> = upper
            .select_root(&doc)
            .iter()
            .map(|&id| doc.text_of(id))
            .collect();
        assert_eq!(hits, vec!["x"]);

        let hits: Vec<_> = lower
            .select_root(&doc)
            .iter()
            .map(|&id| doc.text_of(id))
            .collect();
        assert_eq!(hits, vec!["y"]);
    }
}
