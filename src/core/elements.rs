//! Element-level search primitives
//!
//! Stateless functions over a `&str` view. Positions are byte offsets; the
//! end of the slice is the end of the searchable range.
//! - `element_name`: read the name of the element at a position
//! - `matching_close_angle`: balance `<`/`>` to find where a tag ends
//! - `element_matches`: compare a position against an element name
//! - `find_element` / `find_closing_element`: depth-aware element search
//! - `find_bookmark`: locate `<a name=...>` anchors

use super::attributes::read_attribute;
use super::scanner::{is_space, next_open_angle, starts_with_ignore_case};

/// Read the element name starting at `pos` (just past the `<`)
///
/// The name ends at whitespace, `>`, the end of input, or, when
/// `self_closing_terminates` is set, at a `/>` pair.
pub fn element_name(text: &str, pos: usize, self_closing_terminates: bool) -> &str {
    let bytes = text.as_bytes();
    if pos >= bytes.len() {
        return "";
    }
    let mut end = pos;
    while end < bytes.len() {
        match bytes[end] {
            b'>' => break,
            b if is_space(b) => break,
            b'/' if self_closing_terminates && bytes.get(end + 1) == Some(&b'>') => break,
            _ => end += 1,
        }
    }
    &text[pos..end]
}

enum CloseScan {
    Found(usize),
    Overlap,
    Exhausted { inside_quote: bool },
}

fn scan_close_angle(bytes: &[u8], start: usize, fail_fast: bool, honor_quotes: bool) -> CloseScan {
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut after_equals = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'<' => {
                if fail_fast {
                    return CloseScan::Overlap;
                }
                depth += 1;
            }
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return CloseScan::Found(i);
                }
            }
            b'"' | b'\'' if honor_quotes && after_equals => quote = Some(b),
            _ => {}
        }
        if b == b'=' {
            after_equals = true;
        } else if !is_space(b) {
            after_equals = false;
        }
    }
    CloseScan::Exhausted {
        inside_quote: quote.is_some(),
    }
}

/// Find the `>` that balances the tag starting at (or just after) `pos`
///
/// A leading `<` at `pos` is skipped. A nested `<` raises the depth, or with
/// `fail_fast` aborts the search so the caller can treat the tag as
/// unterminated. Quoted attribute values (a quote directly after `=`) are
/// opaque; if such a value never closes, the scan is retried without quote
/// handling.
pub fn matching_close_angle(text: &str, pos: usize, fail_fast: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let start = if bytes.get(pos) == Some(&b'<') { pos + 1 } else { pos };
    match scan_close_angle(bytes, start, fail_fast, true) {
        CloseScan::Found(end) => Some(end),
        CloseScan::Overlap => None,
        CloseScan::Exhausted { inside_quote: true } => {
            match scan_close_angle(bytes, start, fail_fast, false) {
                CloseScan::Found(end) => Some(end),
                _ => None,
            }
        }
        CloseScan::Exhausted { inside_quote: false } => None,
    }
}

/// Whether the tag containing `pos` ends with `/>`
pub fn is_self_closing(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    let Some(close) = matching_close_angle(text, pos, false) else {
        return false;
    };
    let mut back = close;
    while back > pos && is_space(bytes[back - 1]) {
        back -= 1;
    }
    back > pos && bytes[back - 1] == b'/'
}

#[inline]
fn identity_after_name(text: &str, after: usize, accept_self_terminating: bool) -> bool {
    match text.as_bytes().get(after) {
        None => false,
        Some(b'>') => true,
        Some(b'/') => accept_self_terminating,
        Some(&b) if is_space(b) => accept_self_terminating || !is_self_closing(text, after),
        Some(b';' | b'"' | b'\'') => true,
        Some(_) => false,
    }
}

/// Check whether the element at `pos` (just past the `<`) is `name`, ignoring ASCII case
///
/// The byte after the name decides: `>` matches; `/` matches only when
/// self-terminating tags are accepted; whitespace matches, except that a tag
/// closed with `/>` is rejected when they are not accepted. Running off the
/// end of input never matches.
pub fn element_matches(text: &str, pos: usize, name: &str, accept_self_terminating: bool) -> bool {
    !name.is_empty()
        && starts_with_ignore_case(text.as_bytes(), pos, name.as_bytes())
        && identity_after_name(text, pos + name.len(), accept_self_terminating)
}

/// Case-sensitive variant of [`element_matches`] for XML vocabularies
pub fn element_matches_case_sensitive(
    text: &str,
    pos: usize,
    name: &str,
    accept_self_terminating: bool,
) -> bool {
    !name.is_empty()
        && text.as_bytes()[pos.min(text.len())..].starts_with(name.as_bytes())
        && identity_after_name(text, pos + name.len(), accept_self_terminating)
}

/// Find the `<` of the next element named `name` at or after `from`
pub fn find_element(text: &str, from: usize, name: &str, accept_self_terminating: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos + name.len() < bytes.len() {
        let open = next_open_angle(bytes, pos)?;
        if open + name.len() > bytes.len() {
            return None;
        }
        if element_matches(text, open + 1, name, accept_self_terminating) {
            return Some(open);
        }
        pos = open + 1;
    }
    None
}

/// Find the `<` of the closing tag that balances the element at or after `from`
///
/// If the first tag found is the opening `name` element it is skipped; if it
/// is already the closing tag it is returned. Nested elements of the same
/// name push and pop a depth counter so the correct closing tag is found.
pub fn find_closing_element(text: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if name.is_empty() {
        return None;
    }
    let first = next_open_angle(bytes, from)?;
    if first + name.len() > bytes.len() {
        return None;
    }
    let mut section = from;
    if element_matches(text, first + 1, name, true) {
        section = first + 1 + name.len();
    } else if bytes.get(first + 1) == Some(&b'/') && element_matches(text, first + 2, name, true) {
        return Some(first);
    }

    let mut depth = 1usize;
    let mut cursor = next_open_angle(bytes, section);
    while let Some(open) = cursor {
        if open + name.len() + 1 >= bytes.len() {
            break;
        }
        if bytes[open + 1] == b'/' && element_matches(text, open + 2, name, true) {
            depth -= 1;
        } else if element_matches(text, open + 1, name, true) {
            depth += 1;
        }
        if depth == 0 {
            return Some(open);
        }
        cursor = next_open_angle(bytes, open + 1);
    }
    None
}

/// Look an element name up in an action table
pub fn classify<A: Copy>(table: &[(&str, A)], name: &str, ignore_case: bool) -> Option<A> {
    table
        .iter()
        .find(|(entry, _)| {
            if ignore_case {
                entry.eq_ignore_ascii_case(name)
            } else {
                *entry == name
            }
        })
        .map(|&(_, action)| action)
}

/// Find the next `<a>` that carries a `name` attribute
///
/// Returns the position of the anchor and its bookmark name, with any
/// leading `#` removed. Anchors without a name are skipped.
pub fn find_bookmark(text: &str, from: usize) -> Option<(usize, &str)> {
    let mut pos = from;
    loop {
        let anchor = find_element(text, pos, "a", true)?;
        if let Some(name) = read_attribute(text, anchor, "name", false, false) {
            return Some((anchor, name.strip_prefix('#').unwrap_or(name)));
        }
        pos = anchor + 1;
    }
}
