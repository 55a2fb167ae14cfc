//! Word-processing (DOCX) extraction
//!
//! Reads the `word/document.xml` stream of a DOCX package. Only the content
//! of `w:t` runs is text; paragraph, break, tab, table and alignment
//! elements add layout characters. Field codes (`w:instrText`), drawing
//! offsets and comments are skipped.

use crate::core::attributes::read_attribute;
use crate::core::elements::{classify, element_matches_case_sensitive, element_name};
use crate::core::emitter::{Emitter, TextExtractor};
use crate::core::scanner::{next_open_angle, parse_leading_f64};

use super::{find_marker, tag_end, TagEnd, DIALECT_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocxAction {
    /// Skip everything up to and including the end marker
    Skip(&'static str),
    Paragraph,
    ParagraphStyle,
    Tab,
    TabStopsStart,
    TabStopsEnd,
    LineBreak,
    Justification,
    Indentation,
    Row,
    CellStart,
    CellEnd,
    Text,
}

const DOCX_ELEMENTS: &[(&str, DocxAction)] = &[
    ("w:instrText", DocxAction::Skip("</w:instrText>")),
    ("wp:posOffset", DocxAction::Skip("</wp:posOffset>")),
    ("w:p", DocxAction::Paragraph),
    ("w:pStyle", DocxAction::ParagraphStyle),
    ("w:tab", DocxAction::Tab),
    ("w:tabs", DocxAction::TabStopsStart),
    ("/w:tabs", DocxAction::TabStopsEnd),
    ("w:br", DocxAction::LineBreak),
    ("w:cr", DocxAction::LineBreak),
    ("w:jc", DocxAction::Justification),
    ("w:ind", DocxAction::Indentation),
    ("w:tr", DocxAction::Row),
    ("w:tc", DocxAction::CellStart),
    ("/w:tc", DocxAction::CellEnd),
    ("w:t", DocxAction::Text),
];

/// Paragraph alignments that are rendered as a leading tab
const INDENTING_JUSTIFICATIONS: &[&str] = &["center", "right", "both", "list-tab"];

/// DOCX `document.xml` extractor
#[derive(Debug, Default)]
pub struct DocxExtractor {
    emitter: Emitter,
    preserve_table_layout: bool,
}

impl DocxExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep table rows on one line as tab-separated cells instead of giving
    /// every cell paragraph its own paragraph break
    pub fn set_preserve_table_layout(&mut self, preserve: bool) {
        self.preserve_table_layout = preserve;
    }

    pub fn preserve_table_layout(&self) -> bool {
        self.preserve_table_layout
    }

    fn scan(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let emitter = &mut self.emitter;
        let mut inside_cell = false;
        let mut inside_tab_stops = false;

        let mut cursor = next_open_angle(bytes, 0);
        while let Some(start) = cursor {
            let mut text_section = false;
            let end = if text[start..].starts_with("<!--") {
                match find_marker(text, start + 1, "-->") {
                    Some(end) => end,
                    None => break,
                }
            } else {
                let name = element_name(text, start + 1, true);
                match classify(DOCX_ELEMENTS, name, false) {
                    Some(DocxAction::Skip(marker)) => match find_marker(text, start + 1, marker) {
                        Some(end) => end,
                        None => break,
                    },
                    action => {
                        match action {
                            Some(DocxAction::Paragraph) => {
                                if !self.preserve_table_layout || !inside_cell {
                                    emitter.paragraph_break();
                                }
                            }
                            Some(DocxAction::ParagraphStyle) => {
                                if read_attribute(text, start + 1, "w:val", false, false)
                                    == Some("ListParagraph")
                                {
                                    emitter.tab();
                                }
                            }
                            Some(DocxAction::Tab) if !inside_tab_stops => emitter.tab(),
                            Some(DocxAction::TabStopsStart) => inside_tab_stops = true,
                            Some(DocxAction::TabStopsEnd) => inside_tab_stops = false,
                            Some(DocxAction::LineBreak) => emitter.line_break(),
                            Some(DocxAction::Justification) => {
                                if read_attribute(text, start + 1, "w:val", false, false)
                                    .is_some_and(|value| INDENTING_JUSTIFICATIONS.contains(&value))
                                {
                                    emitter.tab();
                                }
                            }
                            Some(DocxAction::Indentation) => {
                                let left = read_attribute(text, start + 1, "w:left", false, false)
                                    .or_else(|| read_attribute(text, start + 1, "w:start", false, false));
                                if left.is_some_and(|value| parse_leading_f64(value) > 0.0) {
                                    emitter.tab();
                                }
                            }
                            Some(DocxAction::Row) => emitter.paragraph_break(),
                            Some(DocxAction::CellStart) => {
                                emitter.tab();
                                inside_cell = true;
                            }
                            Some(DocxAction::CellEnd) => inside_cell = false,
                            Some(DocxAction::Text) => {
                                text_section = element_matches_case_sensitive(text, start + 1, "w:t", false);
                            }
                            _ => {}
                        }
                        match tag_end(text, start) {
                            Some(TagEnd::Closed(end)) => end,
                            Some(TagEnd::Unterminated(next)) => {
                                emitter.decode_text(&text[start..next]);
                                cursor = Some(next);
                                continue;
                            }
                            None => break,
                        }
                    }
                }
            };

            cursor = next_open_angle(bytes, end);
            if let Some(next) = cursor {
                if text_section {
                    emitter.decode_text(&text[end..next]);
                }
            }
        }
    }
}

impl TextExtractor for DocxExtractor {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn extract(&mut self, text: &str) -> &str {
        if text.is_empty() {
            self.emitter.reset_empty(DIALECT_DEPTH);
        } else if self.emitter.begin(text.len(), DIALECT_DEPTH) {
            self.scan(text);
            self.emitter.finish();
        }
        self.emitter.sink().as_str()
    }
}
