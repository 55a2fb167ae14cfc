//! Input encoding helpers
//!
//! - `sniff_charset`: read the charset a page declares for itself, from a
//!   byte order mark, an HTML `<meta>` tag, or an XML prolog
//! - `decode_input`: turn a raw byte buffer into text for the extractors
//!   (UTF-8 with or without BOM, or BOM-marked UTF-16)
//!
//! Converting legacy code pages is left to the caller; the sniffed name tells
//! it which converter to use.

use super::scanner::{find_byte, find_ignore_case};
use std::borrow::Cow;

/// Byte order mark found at the start of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderMark {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl ByteOrderMark {
    /// Detect a byte order mark
    pub fn detect(input: &[u8]) -> Option<Self> {
        match input {
            [0xEF, 0xBB, 0xBF, ..] => Some(ByteOrderMark::Utf8),
            [0xFF, 0xFE, ..] => Some(ByteOrderMark::Utf16Le),
            [0xFE, 0xFF, ..] => Some(ByteOrderMark::Utf16Be),
            _ => None,
        }
    }

    pub fn len(self) -> usize {
        match self {
            ByteOrderMark::Utf8 => 3,
            ByteOrderMark::Utf16Le | ByteOrderMark::Utf16Be => 2,
        }
    }

    pub fn charset(self) -> &'static str {
        match self {
            ByteOrderMark::Utf8 => "UTF-8",
            ByteOrderMark::Utf16Le => "UTF-16LE",
            ByteOrderMark::Utf16Be => "UTF-16BE",
        }
    }
}

/// Find the character set a document declares
///
/// Checked in order: a byte order mark, an `http-equiv` style
/// `<meta ... content="text/html; charset=...">`, an HTML5
/// `<meta charset=...>`, and (only when there is no `<meta>` at all) the
/// `encoding` of an `<?xml ... ?>` prolog. Returns an empty string when
/// nothing is declared.
pub fn sniff_charset(content: &[u8]) -> String {
    if content.is_empty() {
        return String::new();
    }
    if let Some(bom) = ByteOrderMark::detect(content) {
        return bom.charset().to_string();
    }
    if find_ignore_case(content, 0, b"<meta").is_none() {
        return xml_prolog_encoding(content).unwrap_or_default();
    }
    http_equiv_charset(content)
        .or_else(|| meta_charset_attribute(content))
        .unwrap_or_default()
}

fn xml_prolog_encoding(content: &[u8]) -> Option<String> {
    if !content.starts_with(b"<?xml") {
        return None;
    }
    let prolog_end = find_byte(content, 0, b'>').unwrap_or(content.len());
    let prolog = &content[..prolog_end];
    let attr = find_ignore_case(prolog, 0, b"encoding=")? + b"encoding=".len();
    let quote = *prolog.get(attr)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_end = find_byte(prolog, attr + 1, quote)?;
    Some(String::from_utf8_lossy(&prolog[attr + 1..value_end]).into_owned())
}

/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
fn http_equiv_charset(content: &[u8]) -> Option<String> {
    let mut meta = find_ignore_case(content, 0, b"<meta")?;
    let content_attr = loop {
        let tag_end = find_byte(content, meta, b'>')?;
        let content_type = find_ignore_case(content, meta, b"content-type")?;
        let content_attr = find_ignore_case(content, meta, b" content=")?;
        if content_type < tag_end && content_attr < tag_end {
            break content_attr;
        }
        meta = find_ignore_case(content, tag_end, b"<meta")?;
    };

    let mut start = content_attr + b" content=".len();
    if matches!(content.get(start), Some(b'"' | b'\'')) {
        start += 1;
    }
    let tag_end = match (
        find_byte(content, start, b'>'),
        find_ignore_case(content, start, b"/>"),
    ) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return None,
    };

    let value = match find_ignore_case(content, start, b"charset=") {
        Some(pos) if pos < tag_end => pos + b"charset=".len(),
        _ => match find_byte(content, start, b';') {
            Some(pos) if pos < tag_end => pos + 1,
            _ => return None,
        },
    };
    Some(read_charset_name(content, value, tag_end))
}

/// HTML5 `<meta charset="...">`
fn meta_charset_attribute(content: &[u8]) -> Option<String> {
    let mut meta = find_ignore_case(content, 0, b"<meta")?;
    loop {
        let tag_end = find_byte(content, meta, b'>')?;
        if let Some(pos) = find_ignore_case(&content[..tag_end], meta, b"charset=") {
            let mut value = pos + b"charset=".len();
            if matches!(content.get(value), Some(b'"')) {
                value += 1;
            }
            let name = read_charset_name(content, value, tag_end);
            if !name.is_empty() {
                return Some(name);
            }
        }
        meta = find_ignore_case(content, tag_end, b"<meta")?;
    }
}

/// Read a charset token, dropping leading spaces and single quotes
fn read_charset_name(content: &[u8], from: usize, limit: usize) -> String {
    let mut start = from;
    while start < limit && matches!(content[start], b' ' | b'\'') {
        start += 1;
    }
    let mut end = start;
    while end < limit && !matches!(content[end], b' ' | b'\'' | b'"' | b'/' | b'>' | b';') {
        end += 1;
    }
    String::from_utf8_lossy(&content[start..end]).into_owned()
}

/// Decode raw input bytes into text for extraction
///
/// A UTF-8 BOM is stripped; BOM-marked UTF-16 is transcoded. Anything else
/// is read as UTF-8 with invalid sequences replaced by U+FFFD.
pub fn decode_input(input: &[u8]) -> Cow<'_, str> {
    let Some(bom) = ByteOrderMark::detect(input) else {
        return String::from_utf8_lossy(input);
    };
    let body = &input[bom.len()..];
    match bom {
        ByteOrderMark::Utf8 => String::from_utf8_lossy(body),
        ByteOrderMark::Utf16Le => Cow::Owned(decode_utf16(body, u16::from_le_bytes)),
        ByteOrderMark::Utf16Be => Cow::Owned(decode_utf16(body, u16::from_be_bytes)),
    }
}

fn decode_utf16(input: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = input.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_equiv_meta() {
        let page = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head>";
        assert_eq!(sniff_charset(page), "windows-1252");
    }

    #[test]
    fn test_http_equiv_self_closed() {
        let page = b"<META HTTP-EQUIV=\"content-type\" CONTENT=\"text/html; CHARSET=utf-8\"/>";
        assert_eq!(sniff_charset(page), "utf-8");
    }

    #[test]
    fn test_semicolon_without_charset_key() {
        let page = b"<meta http-equiv=content-type content='text/html; iso-8859-1'>";
        assert_eq!(sniff_charset(page), "iso-8859-1");
    }

    #[test]
    fn test_skips_unrelated_meta() {
        let page = b"<meta name=\"author\" content=\"me\"><meta http-equiv=\"Content-Type\" content=\"text/html; charset=koi8-r\">";
        assert_eq!(sniff_charset(page), "koi8-r");
    }

    #[test]
    fn test_html5_meta_charset() {
        assert_eq!(sniff_charset(b"<head><meta charset=\"utf-8\"></head>"), "utf-8");
        assert_eq!(sniff_charset(b"<meta name=x><meta charset=shift_jis>"), "shift_jis");
    }

    #[test]
    fn test_xml_prolog() {
        let doc = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><root/>";
        assert_eq!(sniff_charset(doc), "ISO-8859-1");
        assert_eq!(sniff_charset(b"<?xml version='1.0' encoding='UTF-8'?>"), "UTF-8");
    }

    #[test]
    fn test_nothing_declared() {
        assert_eq!(sniff_charset(b""), "");
        assert_eq!(sniff_charset(b"<html><p>plain</p></html>"), "");
        assert_eq!(sniff_charset(b"<?xml version=\"1.0\"?>"), "");
    }

    #[test]
    fn test_byte_order_mark() {
        assert_eq!(sniff_charset(&[0xEF, 0xBB, 0xBF, b'<']), "UTF-8");
        assert_eq!(sniff_charset(&[0xFF, 0xFE, b'<', 0]), "UTF-16LE");
        assert_eq!(sniff_charset(&[0xFE, 0xFF, 0, b'<']), "UTF-16BE");
        assert_eq!(ByteOrderMark::Utf8.len(), 3);
        assert_eq!(ByteOrderMark::Utf16Be.len(), 2);
        assert_eq!(decode_input(&[0xEF, 0xBB, 0xBF]), "");
        assert_eq!(decode_input(&[0xFF, 0xFE]), "");
    }

    #[test]
    fn test_decode_input() {
        assert_eq!(decode_input(b"plain"), "plain");
        assert_eq!(decode_input(&[0xEF, 0xBB, 0xBF, b'h', b'i']), "hi");
        assert_eq!(decode_input(&[0xFF, 0xFE, b'h', 0, b'i', 0]), "hi");
        assert_eq!(decode_input(&[0xFE, 0xFF, 0, b'h', 0, b'i']), "hi");
        assert_eq!(decode_input(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }
}
