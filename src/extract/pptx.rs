//! Presentation (PPTX) slide extraction
//!
//! Reads a `ppt/slides/slideN.xml` stream. Text lives in `a:t` elements
//! inside runs (`a:r`) inside paragraphs (`a:p`). Paragraphs are bullets
//! unless their properties carry `a:buNone`; bullets are separated by a
//! blank line, plain lines (text wrapped to fit a box) by a single newline.

use crate::core::attributes::read_attribute;
use crate::core::elements::{find_closing_element, find_element};
use crate::core::emitter::{Emitter, TextExtractor};
use crate::core::scanner::{find_byte, parse_leading_f64};

use super::DIALECT_DEPTH;

/// PPTX slide extractor
#[derive(Debug, Default)]
pub struct PptxExtractor {
    emitter: Emitter,
}

impl PptxExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&mut self, text: &str) {
        let mut bulleted = true;
        let mut paragraph = find_element(text, 0, "a:p", false);
        while let Some(start) = paragraph {
            let previous_bulleted = bulleted;
            bulleted = true;

            let Some(paragraph_end) = find_closing_element(text, start, "a:p") else {
                break;
            };
            let body = &text[..paragraph_end];

            if let Some(props) = find_element(body, start, "a:pPr", true) {
                if let Some(props_end) = find_closing_element(body, props, "a:pPr") {
                    if find_element(&body[..props_end], props, "a:buNone", true).is_some() {
                        bulleted = false;
                    }
                }
                if read_attribute(body, props + 1, "lvl", false, false)
                    .is_some_and(|level| parse_leading_f64(level) >= 1.0)
                {
                    self.emitter.tab();
                }
            }

            // A bullet right after plain lines gets an extra gap
            if bulleted && !previous_bulleted {
                self.emitter.line_break();
            }

            self.scan_runs(body, start);

            if bulleted {
                self.emitter.paragraph_break();
            } else {
                self.emitter.line_break();
            }
            paragraph = find_element(text, paragraph_end, "a:p", false);
        }
    }

    /// Emit the runs of one paragraph; `body` ends at the paragraph's close tag
    fn scan_runs(&mut self, body: &str, start: usize) {
        let mut cursor = start;
        loop {
            let next_break = find_element(body, cursor, "a:br", true);
            let Some(run) = find_element(body, cursor, "a:r", false) else {
                if next_break.is_some() {
                    self.emitter.line_break();
                }
                return;
            };
            let Some(run_end) = find_closing_element(body, run + 1, "a:r") else {
                return;
            };
            if next_break.is_some_and(|br| br < run) {
                self.emitter.line_break();
            }

            let run_body = &body[..run_end];
            let Some(text_open) = find_element(run_body, run + 1, "a:t", false) else {
                // An empty run stands for a space
                let sink = self.emitter.sink();
                if sink.last_char().is_some_and(|c| !c.is_whitespace()) {
                    self.emitter.push(' ');
                }
                cursor = run_end;
                continue;
            };
            let Some(content) = find_byte(run_body.as_bytes(), text_open, b'>').map(|gt| gt + 1) else {
                cursor = run_end;
                continue;
            };
            let Some(text_end) = find_closing_element(run_body, content, "a:t") else {
                cursor = run_end;
                continue;
            };
            self.emitter.decode_text(&run_body[content..text_end]);
            cursor = text_end;
        }
    }
}

impl TextExtractor for PptxExtractor {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn pptx(text: &str) -> String {
        PptxExtractor::new().extract(text).to_string()
    }

    #[test]
    fn test_single_paragraph() {
        let xml = "<p:sld><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang=\"en-US\"/><a:t>Title</a:t></a:r></a:p></p:txBody></p:sld>";
        assert_eq!(pptx(xml), "Title\n\n");
    }

    #[test]
    fn test_empty_run_implies_space() {
        let xml = "<a:p><a:r><a:t>Hello</a:t></a:r><a:r><a:rPr/></a:r><a:r><a:t>World</a:t></a:r></a:p>";
        assert_eq!(pptx(xml), "Hello World\n\n");
    }

    #[test]
    fn test_plain_lines_then_bullet() {
        let xml = "<a:p><a:pPr><a:buNone/></a:pPr><a:r><a:t>one</a:t></a:r></a:p>\
                   <a:p><a:pPr><a:buNone/></a:pPr><a:r><a:t>two</a:t></a:r></a:p>\
                   <a:p><a:r><a:t>three</a:t></a:r></a:p>";
        assert_eq!(pptx(xml), "one\ntwo\n\nthree\n\n");
    }

    #[test]
    fn test_indent_level() {
        let xml = "<a:p><a:pPr lvl=\"1\"/><a:r><a:t>sub</a:t></a:r></a:p>\
                   <a:p><a:pPr lvl=\"0\"/><a:r><a:t>top</a:t></a:r></a:p>";
        assert_eq!(pptx(xml), "\tsub\n\ntop\n\n");
    }

    #[test]
    fn test_line_breaks_between_runs() {
        let xml = "<a:p><a:r><a:t>a</a:t></a:r><a:br/><a:r><a:t>b</a:t></a:r></a:p>";
        assert_eq!(pptx(xml), "a\nb\n\n");
    }

    #[test]
    fn test_trailing_break() {
        let xml = "<a:p><a:r><a:t>a</a:t></a:r><a:br/></a:p>";
        assert_eq!(pptx(xml), "a\n\n\n");
    }

    #[test]
    fn test_entities_decoded() {
        let xml = "<a:p><a:r><a:t>Q&amp;A &lt;today&gt;</a:t></a:r></a:p>";
        assert_eq!(pptx(xml), "Q&A <today>\n\n");
    }

    #[test]
    fn test_unclosed_paragraph_stops() {
        let xml = "<a:p><a:r><a:t>done</a:t></a:r></a:p><a:p><a:r><a:t>cut";
        assert_eq!(pptx(xml), "done\n\n");
    }

    #[test]
    fn test_no_paragraphs() {
        let mut extractor = PptxExtractor::new();
        assert_eq!(extractor.extract("<p:sld><p:cSld/></p:sld>"), "");
        assert_eq!(extractor.extract(""), "");
        assert!(extractor.log().is_empty());
    }
}
