//! SIMD-accelerated byte searching for markup scanning
//!
//! Every search here is bounded by the end of the slice it is given; callers
//! restrict a range by slicing. Uses memchr for the single-byte searches:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! All delimiters the engine cares about are ASCII, so any position returned
//! by these helpers is a valid char boundary when the input came from a `&str`.

use memchr::{memchr, memchr2, memchr3};

/// Whitespace as the extractors see it (ASCII space, tab, line feed,
/// carriage return, vertical tab, form feed)
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Find next occurrence of a byte at or after `from`
#[inline]
pub fn find_byte(input: &[u8], from: usize, byte: u8) -> Option<usize> {
    if from >= input.len() {
        return None;
    }
    memchr(byte, &input[from..]).map(|i| from + i)
}

/// Find next occurrence of either of two bytes
#[inline]
pub fn find_byte2(input: &[u8], from: usize, b1: u8, b2: u8) -> Option<usize> {
    if from >= input.len() {
        return None;
    }
    memchr2(b1, b2, &input[from..]).map(|i| from + i)
}

/// Find next occurrence of any of three bytes
#[inline]
pub fn find_byte3(input: &[u8], from: usize, b1: u8, b2: u8, b3: u8) -> Option<usize> {
    if from >= input.len() {
        return None;
    }
    memchr3(b1, b2, b3, &input[from..]).map(|i| from + i)
}

/// Find next '<' (tag start)
#[inline]
pub fn next_open_angle(input: &[u8], from: usize) -> Option<usize> {
    find_byte(input, from, b'<')
}

/// Find the first byte that is a member of `set`
pub fn find_any(input: &[u8], from: usize, set: &[u8]) -> Option<usize> {
    match set {
        [a] => find_byte(input, from, *a),
        [a, b] => find_byte2(input, from, *a, *b),
        [a, b, c] => find_byte3(input, from, *a, *b, *c),
        _ => input
            .get(from..)?
            .iter()
            .position(|b| set.contains(b))
            .map(|i| from + i),
    }
}

/// Find the first byte that is NOT a member of `set`
pub fn skip_any(input: &[u8], from: usize, set: &[u8]) -> Option<usize> {
    input
        .get(from..)?
        .iter()
        .position(|b| !set.contains(b))
        .map(|i| from + i)
}

/// Check if `needle` occurs at `pos`, ignoring ASCII case
#[inline]
pub fn starts_with_ignore_case(input: &[u8], pos: usize, needle: &[u8]) -> bool {
    input
        .get(pos..pos + needle.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(needle))
}

/// Case-insensitive substring search
///
/// Candidate positions come from a memchr2 scan on both cases of the
/// needle's first byte.
pub fn find_ignore_case(input: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    let first = *needle.first()?;
    let lower = first.to_ascii_lowercase();
    let upper = first.to_ascii_uppercase();
    let mut pos = from;
    while pos + needle.len() <= input.len() {
        let candidate = find_byte2(input, pos, lower, upper)?;
        if candidate + needle.len() > input.len() {
            return None;
        }
        if input[candidate..candidate + needle.len()].eq_ignore_ascii_case(needle) {
            return Some(candidate);
        }
        pos = candidate + 1;
    }
    None
}

/// Quote tracking shared by the not-quoted searches
///
/// A double quote toggles the quoted state and always clears the single-quote
/// flag, so a `"` can close a span opened by `'`. A single quote only toggles
/// when we are outside quotes or closing a single-quoted span, so an
/// apostrophe inside a double-quoted value is inert.
#[derive(Debug, Default, Clone, Copy)]
struct QuoteState {
    in_quotes: bool,
    in_single: bool,
}

impl QuoteState {
    #[inline]
    fn update(&mut self, b: u8) {
        match b {
            b'"' => {
                self.in_quotes = !self.in_quotes;
                self.in_single = false;
            }
            b'\'' if !self.in_quotes || self.in_single => {
                self.in_quotes = !self.in_quotes;
                self.in_single = true;
            }
            _ => {}
        }
    }
}

/// Find `byte` outside of quoted spans. No backslash escapes.
pub fn find_not_quoted(input: &[u8], from: usize, byte: u8) -> Option<usize> {
    let mut quotes = QuoteState::default();
    for (i, &b) in input.get(from..)?.iter().enumerate() {
        quotes.update(b);
        if !quotes.in_quotes && b == byte {
            return Some(from + i);
        }
    }
    None
}

/// Case-insensitive substring search that skips matches inside quoted spans
///
/// The match at a position is tested before that position's byte updates the
/// quote state, so a needle that begins with a quote is still findable.
pub fn find_substring_not_quoted(input: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut quotes = QuoteState::default();
    let mut pos = from;
    while pos + needle.len() <= input.len() {
        if !quotes.in_quotes && input[pos..pos + needle.len()].eq_ignore_ascii_case(needle) {
            return Some(pos);
        }
        quotes.update(input[pos]);
        pos += 1;
    }
    None
}

/// Parse the leading decimal number of a string, returning 0.0 when there is none
///
/// Accepts leading whitespace, a sign, digits with an optional fraction, and an
/// optional exponent; anything after that (units such as `in` or `cm`) is ignored.
pub fn parse_leading_f64(value: &str) -> f64 {
    let bytes = value.as_bytes();
    let mut pos = skip_any(bytes, 0, b" \t\n\r").unwrap_or(bytes.len());
    let start = pos;
    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }
    let digits_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let mut mantissa_digits = pos - digits_start;
    if bytes.get(pos) == Some(&b'.') {
        let fraction_start = pos + 1;
        let mut end = fraction_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        mantissa_digits += end - fraction_start;
        if mantissa_digits > 0 {
            pos = end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = exp;
        while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            exp += 1;
        }
        if exp > exp_digits {
            pos = exp;
        }
    }
    value[start..pos].parse().unwrap_or(0.0)
}
