//! Attribute lookup inside a single tag
//!
//! Attributes are located by name within the bounds of the tag that starts at
//! the given position (up to its balancing `>`). Names inside another
//! attribute's quoted value are skipped unless the caller asks for quoted
//! matches, which is how CSS properties inside `style="..."` are read.

use super::elements::matching_close_angle;
use super::scanner::{find_any, find_ignore_case, find_substring_not_quoted, is_space, skip_any};

/// Find the position of attribute `name` in the tag at `pos`
///
/// A candidate only counts when it starts the search range, follows
/// whitespace or `;`, or (quoted mode) follows a quote. This keeps `color`
/// from matching inside `bgcolor`.
pub fn find_attribute(text: &str, pos: usize, name: &str, allow_quoted: bool) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    let bytes = text.as_bytes();
    let end = matching_close_angle(text, pos, false)?;
    let region = &bytes[..end];
    let mut search = pos;
    loop {
        let found = if allow_quoted {
            find_ignore_case(region, search, name.as_bytes())
        } else {
            find_substring_not_quoted(region, search, name.as_bytes())
        }?;
        if found == pos {
            return Some(found);
        }
        let prev = bytes[found - 1];
        if (allow_quoted && matches!(prev, b'"' | b'\'')) || is_space(prev) || prev == b';' {
            return Some(found);
        }
        search = found + name.len();
    }
}

/// Read the value of attribute `name` in the tag at `pos`
///
/// Leading ` ="':` are skipped. The value ends at the first quote or `>`,
/// and also at a space unless `allow_spaces`, and at `;` in quoted (CSS)
/// mode. A value that runs into the tag's `>` loses trailing `/` and spaces;
/// `/` is not a terminator because it is common inside paths.
pub fn read_attribute<'a>(
    text: &'a str,
    pos: usize,
    name: &str,
    allow_quoted: bool,
    allow_spaces: bool,
) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let found = find_attribute(text, pos, name, allow_quoted)?;
    let end = matching_close_angle(text, pos, false)?;
    let value_start = skip_any(&bytes[..end], found + name.len(), b" =\"':")?;
    let terminators: &[u8] = match (allow_quoted, allow_spaces) {
        (true, true) => b"\"'>;",
        (true, false) => b" \"'>;",
        (false, true) => b"\"'>",
        (false, false) => b" \"'>",
    };
    let mut value_end = find_any(bytes, value_start, terminators)?;
    if value_end > end {
        return None;
    }
    if bytes[value_end] == b'>' {
        while value_end - 1 > value_start && matches!(bytes[value_end - 1], b'/' | b' ') {
            value_end -= 1;
        }
    }
    Some(&text[value_start..value_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple_attribute() {
        let tag = "<w:jc w:val=\"center\"/>";
        assert_eq!(read_attribute(tag, 0, "w:val", false, false), Some("center"));
    }

    #[test]
    fn test_decoy_inside_quoted_value() {
        let tag = "<font title=\"face=Symbol\" face=\"Arial\">";
        assert_eq!(read_attribute(tag, 0, "face", false, true), Some("Arial"));
    }

    #[test]
    fn test_quoted_css_property() {
        let tag = "<span style=\"color: red; font-family: Symbol\">";
        assert_eq!(
            read_attribute(tag, 0, "font-family", true, true),
            Some("Symbol")
        );
        assert_eq!(read_attribute(tag, 0, "color", true, false), Some("red"));
    }

    #[test]
    fn test_not_a_suffix_match() {
        let tag = "<td bgcolor=red>";
        assert_eq!(read_attribute(tag, 0, "color", false, false), None);
        assert!(find_attribute(tag, 0, "bgcolor", false).is_some());
    }

    #[test]
    fn test_value_with_spaces() {
        let tag = "<param name=\"Name\" value=\"Hello World\">";
        assert_eq!(read_attribute(tag, 0, "value", false, true), Some("Hello World"));
        assert_eq!(read_attribute(tag, 0, "value", false, false), Some("Hello"));
    }

    #[test]
    fn test_trailing_self_close_trimmed() {
        let tag = "<img src=a.gif />";
        assert_eq!(read_attribute(tag, 0, "src", false, true), Some("a.gif"));
        assert_eq!(read_attribute(tag, 0, "src", false, false), Some("a.gif"));
    }

    #[test]
    fn test_attribute_outside_tag_ignored() {
        let text = "<p>face=Symbol";
        assert_eq!(read_attribute(text, 0, "face", false, false), None);
    }
}
