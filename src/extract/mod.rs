//! Format-specific extractors
//!
//! Each dialect reuses the core primitives and the shared `Emitter`, with
//! its own element table:
//! - Docx: word-processing `document.xml`
//! - Pptx: presentation `slideN.xml`
//! - Odt: office-document `content.xml`
//! - HelpIndex: HTML Help index and contents files (HHK/HHC)
//! - Hyperlinks: strips `<a href>` wrappers from HTML, keeping the markup
//!
//! Dialects start inside a preformatted region: whitespace in these XML
//! streams is content, not layout.

pub mod docx;
pub mod help_index;
pub mod hyperlinks;
pub mod odt;
pub mod pptx;

pub use docx::DocxExtractor;
pub use help_index::HelpIndexExtractor;
pub use hyperlinks::HyperlinkStripper;
pub use odt::OdtExtractor;
pub use pptx::PptxExtractor;

/// Preformatted depth every dialect starts from
pub(crate) const DIALECT_DEPTH: usize = 1;

/// Where a tag opened at `start` ends, for the flat XML dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagEnd {
    /// Position just past the `>`
    Closed(usize),
    /// Another `<` came first; the tag is literal text up to here
    Unterminated(usize),
}

/// Find the first `<` or `>` after the tag open at `start`
pub(crate) fn tag_end(text: &str, start: usize) -> Option<TagEnd> {
    let bytes = text.as_bytes();
    let pos = crate::core::scanner::find_byte2(bytes, start + 1, b'<', b'>')?;
    Some(if bytes[pos] == b'<' {
        TagEnd::Unterminated(pos)
    } else {
        TagEnd::Closed(pos + 1)
    })
}

/// Position just past the next (case-sensitive) `marker` at or after `from`
pub(crate) fn find_marker(text: &str, from: usize, marker: &str) -> Option<usize> {
    text.get(from..)?
        .find(marker)
        .map(|pos| from + pos + marker.len())
}
