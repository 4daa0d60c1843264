//! Strict XML parsing.
//!
//! Unlike the HTML side, malformed input is a hard [`Error::Parse`]:
//! mismatched or unclosed tags, multiple root elements, junk at the top
//! level, and undefined entity references all fail the parse. Tag case is
//! preserved and matched exactly.

use html5ever::{LocalName, QualName, ns};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::dom::{Attribute, Document, NodeId};
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_xml_encoding};

/// Parse XML bytes into a [`Document`].
///
/// The encoding declared in the XML declaration is used as a decoding hint
/// when the bytes are not valid UTF-8.
pub fn parse_xml(bytes: &[u8]) -> Result<Document> {
    let hint = extract_xml_encoding(bytes).map(|s| s.to_string());
    let text = decode_text(bytes, hint.as_deref());
    parse_xml_str(&text)
}

/// Parse an XML string into a [`Document`].
pub fn parse_xml_str(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    let mut doc = Document::new(false);

    // Open-element stack; the top is where content lands.
    let mut stack: Vec<NodeId> = Vec::new();
    let mut root_seen = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let parent = match stack.last() {
                    Some(&id) => id,
                    None => {
                        if root_seen {
                            return Err(Error::Parse(
                                "multiple root elements in XML document".into(),
                            ));
                        }
                        root_seen = true;
                        doc.root()
                    }
                };
                let element = create_element(&mut doc, &e)?;
                doc.append(parent, element);
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let parent = match stack.last() {
                    Some(&id) => id,
                    None => {
                        if root_seen {
                            return Err(Error::Parse(
                                "multiple root elements in XML document".into(),
                            ));
                        }
                        root_seen = true;
                        doc.root()
                    }
                };
                let element = create_element(&mut doc, &e)?;
                doc.append(parent, element);
            }
            Ok(Event::End(_)) => {
                // Name mismatches are already rejected by the reader
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                match stack.last() {
                    Some(&parent) => doc.append_text(parent, &raw),
                    None => {
                        if !raw.trim().is_empty() {
                            return Err(Error::Parse(format!(
                                "text outside the root element: {:?}",
                                raw.trim()
                            )));
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                // CDATA content is taken verbatim
                let raw = String::from_utf8_lossy(e.as_ref());
                match stack.last() {
                    Some(&parent) => doc.append_text(parent, &raw),
                    None => {
                        return Err(Error::Parse("CDATA outside the root element".into()));
                    }
                }
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref()).into_owned();
                let Some(&parent) = stack.last() else {
                    return Err(Error::Parse(format!(
                        "entity reference &{entity}; outside the root element"
                    )));
                };
                match resolve_entity(&entity) {
                    Some(resolved) => doc.append_text(parent, &resolved),
                    None => {
                        return Err(Error::Parse(format!(
                            "undefined entity reference: &{entity};"
                        )));
                    }
                }
            }
            Ok(Event::Comment(e)) => {
                let parent = stack.last().copied().unwrap_or(doc.root());
                let comment = doc.create_comment(String::from_utf8_lossy(e.as_ref()).into_owned());
                doc.append(parent, comment);
            }
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => {
                if let Some(&open) = stack.last() {
                    let tag = doc
                        .element_name(open)
                        .map(|n| n.as_ref().to_string())
                        .unwrap_or_default();
                    return Err(Error::Parse(format!(
                        "unexpected end of input, <{tag}> is not closed"
                    )));
                }
                if !root_seen {
                    return Err(Error::Parse("no root element in XML document".into()));
                }
                break;
            }
            Err(e) => return Err(Error::Parse(e.to_string())),
        }
    }

    Ok(doc)
}

fn create_element(doc: &mut Document, e: &quick_xml::events::BytesStart<'_>) -> Result<NodeId> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Parse(format!("malformed attribute: {err}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let value = quick_xml::escape::unescape(&raw)
            .map_err(|err| Error::Parse(format!("bad entity in attribute '{key}': {err}")))?
            .into_owned();
        attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(key)),
            value,
        });
    }

    Ok(doc.create_element(QualName::new(None, ns!(), LocalName::from(name)), attrs))
}

/// Resolve predefined XML entities and numeric character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = parse_xml(b"<root><item>a</item><item>b</item></root>").unwrap();
        let root = doc.find_by_tag("root").unwrap();
        let items: Vec<_> = doc
            .children(root)
            .filter(|&c| doc.is_element(c))
            .map(|c| doc.text_of(c))
            .collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_case_preserved() {
        let doc = parse_xml(b"<Root><DT>x</DT></Root>").unwrap();
        assert!(doc.find_by_tag("DT").is_some());
        assert!(doc.find_by_tag("dt").is_none());
    }

    #[test]
    fn test_empty_element_and_attrs() {
        let doc = parse_xml(br#"<root><col name="a &amp; b"/></root>"#).unwrap();
        let col = doc.find_by_tag("col").unwrap();
        assert_eq!(doc.get_attr(col, "name"), Some("a & b"));
    }

    #[test]
    fn test_mismatched_tag_fails() {
        let err = parse_xml(b"<root><a>x</b></root>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_unclosed_tag_fails() {
        let err = parse_xml(b"<dl><dt>order").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_multiple_roots_fail() {
        let err = parse_xml(b"<a/><b/>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_top_level_text_fails() {
        let err = parse_xml(b"junk<root/>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse_xml(b"   ").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_entities_resolved() {
        let doc = parse_xml(b"<p>a &amp; b &#233; &#x41;</p>").unwrap();
        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.text_of(p), "a & b \u{e9} A");
    }

    #[test]
    fn test_undefined_entity_fails() {
        let err = parse_xml(b"<p>&nbsp;</p>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_cdata_verbatim() {
        let doc = parse_xml(b"<p><![CDATA[a < b & c]]></p>").unwrap();
        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.text_of(p), "a < b & c");
    }

    #[test]
    fn test_interior_whitespace_preserved() {
        let doc = parse_xml(b"<td>  Alberta <b>Prov.</b>  </td>").unwrap();
        let td = doc.find_by_tag("td").unwrap();
        assert_eq!(doc.text_of(td).trim(), "Alberta Prov.");
    }
}
