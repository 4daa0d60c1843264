//! Lenient HTML parsing.
//!
//! Malformed markup (unclosed tags, implicit nesting, stray entities) is
//! repaired by html5ever's HTML5 tree construction, the same rules a browser
//! applies. Parsing HTML never fails.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::dom::{Document, DomSink};
use crate::util::decode_text;

/// Parse HTML bytes into a [`Document`].
///
/// Input is decoded as UTF-8 with a Windows-1252 fallback before parsing.
pub fn parse_html(bytes: &[u8]) -> Document {
    let text = decode_text(bytes, None);
    let sink = DomSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(text.as_bytes());
    result.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let doc = parse_html(b"<html><body><table><tr><td>x</td></tr></table></body></html>");
        assert!(doc.find_by_tag("table").is_some());
        assert!(doc.find_by_tag("body").is_some());
    }

    #[test]
    fn test_parse_fragment_gets_wrapped() {
        // html5ever supplies html/head/body around bare content
        let doc = parse_html(b"<p>loose</p>");
        assert!(doc.find_by_tag("body").is_some());
        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.text_of(p), "loose");
    }

    #[test]
    fn test_malformed_never_fails() {
        let doc = parse_html(b"<dl><dt>a<dd>b<table><td>");
        assert!(doc.find_by_tag("dl").is_some());
    }

    #[test]
    fn test_tag_names_lowercased() {
        let doc = parse_html(b"<DIV>x</DIV>");
        let div = doc.find_by_tag("div").unwrap();
        assert_eq!(doc.element_name(div).unwrap().as_ref(), "div");
    }
}
