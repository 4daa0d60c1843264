//! Byte-to-text decoding helpers.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252 (common on older web pages)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    // Windows-1252 is a superset of ISO-8859-1
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from an XML declaration.
///
/// Parses `<?xml ... encoding="..." ?>` in the first ~100 bytes and returns
/// the encoding name if found.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    if after_enc.is_empty() {
        return None;
    }

    let quote = after_enc[0];
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_start = 1;
    let value_end = after_enc[value_start..].iter().position(|&b| b == quote)? + value_start;

    std::str::from_utf8(&after_enc[value_start..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // 0xE9 is é in Windows-1252 but malformed UTF-8
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, None), "café");
    }

    #[test]
    fn test_decode_with_hint() {
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "café");
    }

    #[test]
    fn test_extract_xml_encoding() {
        let xml = br#"<?xml version="1.0" encoding="ISO-8859-1"?><root/>"#;
        assert_eq!(extract_xml_encoding(xml), Some("ISO-8859-1"));

        let xml = br#"<?xml version="1.0"?><root/>"#;
        assert_eq!(extract_xml_encoding(xml), None);

        assert_eq!(extract_xml_encoding(b"<root/>"), None);
    }
}
