//! Shared text emitter for every extractor
//!
//! Owns the output sink and the preformatted-depth counter, and decodes the
//! text that appears between tags:
//! - Line-break runs collapse to one space outside preformatted regions
//! - Named and numeric entities are decoded, with recovery for the usual
//!   malformations (missing semicolons, bare ampersands, double encoding)
//! - Symbol-font spans are remapped in place after they are written
//!
//! Extractors own an `Emitter` and drive it from their own scan loops.

use super::entities::{decode_named, decode_numeric, expand_code_point, Expansion};
use super::scanner::{find_any, find_byte, find_byte3, is_space};
use super::sink::TextSink;
use super::symbols::remap_symbol_text;

/// Bytes that end a candidate entity name
const ENTITY_TERMINATORS: &[u8] = b";< \t\n\r";

#[inline]
fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Decoding state shared by the HTML tokenizer and the dialect extractors
#[derive(Debug, Default)]
pub struct Emitter {
    sink: TextSink,
    preformatted_depth: usize,
    depth_floor: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new call and size the output buffer
    ///
    /// `depth` is both the starting preformatted depth and the floor it never
    /// drops below. Returns false (with a log entry) when the buffer cannot be
    /// prepared; the caller then returns empty output.
    pub fn begin(&mut self, capacity: usize, depth: usize) -> bool {
        self.sink.clear_log();
        self.preformatted_depth = depth;
        self.depth_floor = depth;
        match self.sink.allocate(capacity) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("text extraction aborted: {}", err);
                self.sink.clear();
                self.sink.log(&format!("Unable to allocate memory for extracting text: {}", err));
                false
            }
        }
    }

    /// Reset for a call on empty input: no text, no log
    pub fn reset_empty(&mut self, depth: usize) {
        self.sink.clear_log();
        self.sink.clear();
        self.preformatted_depth = depth;
        self.depth_floor = depth;
    }

    /// Close out a call, noting any writes the capacity limit dropped
    pub fn finish(&mut self) {
        if let Err(err) = self.sink.check_capacity() {
            log::warn!("text extraction truncated: {}", err);
            self.sink.log(&format!(
                "Output exceeded the fixed capacity of the text buffer ({}); the remaining text was dropped.",
                err
            ));
        }
    }

    pub fn sink(&self) -> &TextSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut TextSink {
        &mut self.sink
    }

    pub fn log(&mut self, message: &str) {
        self.sink.log(message);
    }

    // ========================================================================
    // Preformatted regions
    // ========================================================================

    #[inline]
    pub fn is_preformatted(&self) -> bool {
        self.preformatted_depth > 0
    }

    pub fn preformatted_depth(&self) -> usize {
        self.preformatted_depth
    }

    pub fn enter_preformatted(&mut self) {
        self.preformatted_depth += 1;
    }

    pub fn leave_preformatted(&mut self) {
        if self.preformatted_depth > self.depth_floor {
            self.preformatted_depth -= 1;
        }
    }

    // ========================================================================
    // Structural output
    // ========================================================================

    #[inline]
    pub fn push(&mut self, c: char) {
        self.sink.push(c);
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.sink.push_str(s);
    }

    pub fn paragraph_break(&mut self) {
        self.sink.push_str("\n\n");
    }

    pub fn line_break(&mut self) {
        self.sink.push('\n');
    }

    pub fn tab(&mut self) {
        self.sink.push('\t');
    }

    /// Copy text through with no decoding at all (CDATA)
    pub fn copy_verbatim(&mut self, text: &str) {
        self.sink.push_str(text);
    }

    /// Remap everything written since `start` through the Symbol font table
    pub fn remap_symbols_since(&mut self, start: usize) {
        let written = self.sink.tail(start);
        if written.is_empty() {
            return;
        }
        let remapped = remap_symbol_text(written);
        self.sink.replace_tail(start, &remapped);
        let message = format!("Symbol font used for the following: \"{}\"", self.sink.tail(start));
        self.sink.log(&message);
    }

    // ========================================================================
    // Inter-tag text
    // ========================================================================

    /// Decode a span of text found between tags and append it
    pub fn decode_text(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let special = if self.is_preformatted() {
                find_byte(bytes, pos, b'&')
            } else {
                find_byte3(bytes, pos, b'\r', b'\n', b'&')
            };
            let Some(idx) = special else {
                break;
            };
            self.sink.push_str(&text[pos..idx]);
            pos = if bytes[idx] == b'&' {
                self.decode_entity(text, idx)
            } else {
                self.sink.push(' ');
                skip_line_breaks(bytes, idx)
            };
        }
        self.sink.push_str(&text[pos..]);
    }

    /// Decode the entity starting at the `&` at `amp`; returns where to resume
    fn decode_entity(&mut self, text: &str, amp: usize) -> usize {
        let bytes = text.as_bytes();
        let after = amp + 1;

        // bare ampersand followed by whitespace
        if bytes.get(after).is_some_and(|&b| is_space(b)) {
            self.sink.push_str("& ");
            self.sink.log("Unencoded ampersand: \"& \"");
            return after + 1;
        }

        let terminator = find_any(bytes, after, ENTITY_TERMINATORS);
        let body_end = terminator.unwrap_or(bytes.len());
        let boundary = terminator.map(|t| bytes[t]);
        let resume = terminator.map_or(bytes.len(), |t| t + 1);

        if bytes.get(after) == Some(&b'#') {
            return self.decode_numeric_entity(text, amp, body_end, boundary, resume);
        }

        let name = &text[after..body_end];
        let resolved = decode_named(name);
        match (resolved, boundary) {
            (None, Some(b';')) => {
                self.sink.push('?');
                self.sink
                    .log(&format!("Unknown HTML entity: {}", &text[amp..body_end]));
                resume
            }
            (None, Some(b)) => {
                self.sink.log(&format!(
                    "Unencoded ampersand or unknown HTML entity: {}",
                    &text[amp..body_end]
                ));
                self.sink.push_str(&text[amp..body_end]);
                self.push_boundary(bytes, b, body_end)
            }
            (None, None) => {
                self.sink.push('&');
                self.sink.log(&format!(
                    "Unterminated ampersand or HTML entity: {}",
                    &text[amp..]
                ));
                after
            }
            (Some('&'), Some(b';')) => self.decode_double_encoded(text, amp, body_end),
            (Some(c), Some(b';')) => {
                self.emit_code_point(c as u32);
                resume
            }
            (Some(c), Some(b)) => {
                self.emit_code_point(c as u32);
                self.log_missing_semicolon(&text[amp..body_end]);
                self.push_boundary(bytes, b, body_end)
            }
            (Some(c), None) => {
                self.emit_code_point(c as u32);
                self.log_missing_semicolon(&text[amp..body_end]);
                resume
            }
        }
    }

    fn decode_numeric_entity(
        &mut self,
        text: &str,
        amp: usize,
        body_end: usize,
        boundary: Option<u8>,
        resume: usize,
    ) -> usize {
        let bytes = text.as_bytes();
        let mut digits_start = amp + 2;
        let hex = matches!(bytes.get(digits_start), Some(b'x' | b'X'));
        if hex {
            digits_start += 1;
        }
        let digits = text.get(digits_start..body_end).unwrap_or("");
        let expansion = decode_numeric(digits, hex).and_then(expand_code_point);
        let Some(expansion) = expansion else {
            let raw = &text[amp..resume];
            self.sink
                .log(&format!("Invalid numeric HTML entity: {}", raw));
            self.sink.push_str(raw);
            return resume;
        };
        self.emit_expansion(expansion);
        match boundary {
            Some(b';') => resume,
            Some(b) => {
                self.log_missing_semicolon(&text[amp..body_end]);
                self.push_boundary(bytes, b, body_end)
            }
            None => {
                self.log_missing_semicolon(&text[amp..body_end]);
                resume
            }
        }
    }

    /// `&amp;le;` style double encoding: emit the inner entity instead
    fn decode_double_encoded(&mut self, text: &str, amp: usize, semicolon: usize) -> usize {
        let bytes = text.as_bytes();
        let inner_start = semicolon + 1;
        let inner_end = bytes[inner_start..]
            .iter()
            .position(|&b| is_space(b) || b == b';')
            .map(|i| inner_start + i);
        if let Some(inner_end) = inner_end.filter(|&end| bytes[end] == b';') {
            if let Some(inner) = decode_named(&text[inner_start..inner_end]) {
                self.sink.log(&format!(
                    "Ampersand incorrectly encoded in HTML entity: {}",
                    &text[amp..=inner_end]
                ));
                self.emit_code_point(inner as u32);
                return inner_end + 1;
            }
        }
        self.sink.push('&');
        semicolon + 1
    }

    fn log_missing_semicolon(&mut self, entity: &str) {
        self.sink
            .log(&format!("Missing semicolon on HTML entity: {}", entity));
    }

    /// Emit the byte that ended a semicolon-less entity; returns where to resume
    fn push_boundary(&mut self, bytes: &[u8], boundary: u8, at: usize) -> usize {
        if is_line_break(boundary) && !self.is_preformatted() {
            self.sink.push(' ');
            return skip_line_breaks(bytes, at);
        }
        self.sink.push(boundary as char);
        at + 1
    }

    fn emit_code_point(&mut self, code: u32) {
        if let Some(expansion) = expand_code_point(code) {
            self.emit_expansion(expansion);
        }
    }

    fn emit_expansion(&mut self, expansion: Expansion) {
        match expansion {
            Expansion::Drop => {}
            Expansion::Char(c) => self.sink.push(c),
            Expansion::Ligature(letters) => self.sink.push_str(letters),
        }
    }
}

/// Common surface of every extractor
///
/// An extractor may be reused; each call to `extract` resets the log, the
/// preformatted depth, and the previous output.
pub trait TextExtractor {
    fn emitter(&self) -> &Emitter;

    fn emitter_mut(&mut self) -> &mut Emitter;

    /// Extract plain text from `text` and return it
    fn extract(&mut self, text: &str) -> &str;

    /// Text produced by the last call
    fn text(&self) -> &str {
        self.emitter().sink().as_str()
    }

    fn len(&self) -> usize {
        self.emitter().sink().len()
    }

    fn is_empty(&self) -> bool {
        self.emitter().sink().is_empty()
    }

    /// Diagnostics recorded by the last call
    fn log(&self) -> &str {
        self.emitter().sink().log_text()
    }

    fn set_log_separator(&mut self, separator: &str) {
        self.emitter_mut().sink_mut().set_log_separator(separator);
    }

    fn sink_mut(&mut self) -> &mut TextSink {
        self.emitter_mut().sink_mut()
    }
}

fn skip_line_breaks(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < bytes.len() && is_line_break(bytes[pos]) {
        pos += 1;
    }
    pos
}
