//! Office-document (ODT) extraction
//!
//! Reads the `content.xml` stream of an OpenDocument text package. Text is
//! only taken from inside paragraphs, headings and spans; lists, tables,
//! tabs and hard breaks add layout characters.
//!
//! Before the main scan, the `office:automatic-styles` section is read for
//! paragraph styles that are centered, end-aligned, or carry a left margin.
//! Paragraphs using one of those styles start with a tab.

use std::collections::HashSet;

use crate::core::attributes::read_attribute;
use crate::core::elements::{
    classify, element_name, find_closing_element, find_element, is_self_closing, matching_close_angle,
};
use crate::core::emitter::{Emitter, TextExtractor};
use crate::core::scanner::{next_open_angle, parse_leading_f64};

use super::{find_marker, tag_end, TagEnd, DIALECT_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OdtAction {
    /// Skip everything up to and including the end marker
    Skip(&'static str),
    Paragraph,
    Span,
    SectionEnd,
    ListItemStart,
    ListItemEnd,
    Row,
    CellStart,
    CellEnd,
    Tab,
    LineBreak,
    Spaces,
}

const ODT_ELEMENTS: &[(&str, OdtAction)] = &[
    ("office:annotation", OdtAction::Skip("</office:annotation>")),
    ("text:p", OdtAction::Paragraph),
    ("text:h", OdtAction::Paragraph),
    ("text:span", OdtAction::Span),
    ("/text:p", OdtAction::SectionEnd),
    ("/text:h", OdtAction::SectionEnd),
    ("/text:span", OdtAction::SectionEnd),
    ("text:list-item", OdtAction::ListItemStart),
    ("/text:list-item", OdtAction::ListItemEnd),
    ("table:table-row", OdtAction::Row),
    ("table:table-cell", OdtAction::CellStart),
    ("/table:table-cell", OdtAction::CellEnd),
    ("text:tab", OdtAction::Tab),
    ("text:line-break", OdtAction::LineBreak),
    ("text:s", OdtAction::Spaces),
];

const STYLE_END: &str = "</style:style>";

/// Upper bound for the space run of one `text:s`
const MAX_SPACE_RUN: usize = 256;

/// ODT `content.xml` extractor
#[derive(Debug, Default)]
pub struct OdtExtractor {
    emitter: Emitter,
    preserve_table_layout: bool,
    indented_styles: HashSet<String>,
}

impl OdtExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep list items and table cells on one line instead of giving each of
    /// their paragraphs its own paragraph break
    pub fn set_preserve_table_layout(&mut self, preserve: bool) {
        self.preserve_table_layout = preserve;
    }

    pub fn preserve_table_layout(&self) -> bool {
        self.preserve_table_layout
    }

    /// Collect the names of automatic paragraph styles that indent
    fn read_paragraph_styles(&mut self, text: &str) {
        self.indented_styles.clear();
        let Some(styles) = find_element(text, 0, "office:automatic-styles", false) else {
            return;
        };
        let Some(styles_end) = find_closing_element(text, styles, "office:automatic-styles") else {
            return;
        };
        let section = &text[..styles_end];

        let mut cursor = find_element(section, styles, "style:style", true);
        while let Some(style) = cursor {
            let next = if is_self_closing(section, style) {
                matching_close_angle(section, style, false).map(|gt| gt + 1)
            } else {
                let style_end = find_closing_element(section, style, "style:style");
                if let Some(style_end) = style_end {
                    if let Some(name) = indented_style_name(&section[..style_end], style) {
                        self.indented_styles.insert(name.to_string());
                    }
                }
                style_end.map(|end| end + STYLE_END.len())
            };
            let Some(next) = next else {
                break;
            };
            cursor = find_element(section, next, "style:style", true);
        }
        log::trace!("odt: {} indented paragraph styles", self.indented_styles.len());
    }

    fn scan(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let emitter = &mut self.emitter;
        let mut section_depth = 0usize;
        let mut inside_item = false;

        let mut cursor = next_open_angle(bytes, 0);
        while let Some(start) = cursor {
            let end = if text[start..].starts_with("<!--") {
                match find_marker(text, start + 1, "-->") {
                    Some(end) => end,
                    None => break,
                }
            } else {
                let name = element_name(text, start + 1, true);
                let action = classify(ODT_ELEMENTS, name, false);
                if let Some(OdtAction::Skip(marker)) = action {
                    match find_marker(text, start + 1, marker) {
                        Some(end) => end,
                        None => break,
                    }
                } else {
                    let end = match tag_end(text, start) {
                        Some(TagEnd::Closed(end)) => end,
                        Some(TagEnd::Unterminated(next)) => {
                            emitter.decode_text(&text[start..next]);
                            cursor = Some(next);
                            continue;
                        }
                        None => break,
                    };
                    let self_closing = bytes[end - 2] == b'/';
                    match action {
                        Some(OdtAction::Paragraph) => {
                            if !self.preserve_table_layout || !inside_item {
                                emitter.paragraph_break();
                                if read_attribute(text, start + 1, "text:style-name", false, false)
                                    .is_some_and(|style| self.indented_styles.contains(style))
                                {
                                    emitter.tab();
                                }
                            }
                            if !self_closing {
                                section_depth += 1;
                            }
                        }
                        Some(OdtAction::Span) if !self_closing => section_depth += 1,
                        Some(OdtAction::SectionEnd) => section_depth = section_depth.saturating_sub(1),
                        Some(OdtAction::ListItemStart) => {
                            emitter.line_break();
                            emitter.tab();
                            inside_item = true;
                        }
                        Some(OdtAction::CellStart) => {
                            emitter.tab();
                            inside_item = true;
                        }
                        Some(OdtAction::ListItemEnd | OdtAction::CellEnd) => inside_item = false,
                        Some(OdtAction::Row) => emitter.paragraph_break(),
                        Some(OdtAction::Tab) => emitter.tab(),
                        Some(OdtAction::LineBreak) => emitter.line_break(),
                        Some(OdtAction::Spaces) => {
                            let count = read_attribute(text, start + 1, "text:c", false, false)
                                .and_then(|count| count.parse::<usize>().ok())
                                .unwrap_or(1);
                            for _ in 0..count.min(MAX_SPACE_RUN) {
                                emitter.push(' ');
                            }
                        }
                        _ => {}
                    }
                    end
                }
            };

            cursor = next_open_angle(bytes, end);
            if let Some(next) = cursor {
                if section_depth > 0 {
                    emitter.decode_text(&text[end..next]);
                }
            }
        }
    }
}

/// Name of the style at `style` if its paragraph properties indent
///
/// `style_text` ends at the style's closing tag.
fn indented_style_name(style_text: &str, style: usize) -> Option<&str> {
    let name = read_attribute(style_text, style + 1, "style:name", false, true).filter(|name| !name.is_empty())?;
    let props = find_element(style_text, style, "style:paragraph-properties", true)?;
    let indented = match read_attribute(style_text, props + 1, "fo:text-align", false, true) {
        Some("center" | "end") => true,
        _ => read_attribute(style_text, props + 1, "fo:margin-left", false, true)
            .is_some_and(|margin| parse_leading_f64(margin) > 0.0),
    };
    indented.then_some(name)
}

impl TextExtractor for OdtExtractor {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn extract(&mut self, text: &str) -> &str {
        if text.is_empty() {
            self.emitter.reset_empty(DIALECT_DEPTH);
            self.indented_styles.clear();
        } else if self.emitter.begin(text.len(), DIALECT_DEPTH) {
            self.read_paragraph_styles(text);
            self.scan(text);
            self.emitter.finish();
        }
        self.emitter.sink().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = "<office:automatic-styles>\
        <style:style style:name=\"P1\" style:family=\"paragraph\"><style:paragraph-properties fo:text-align=\"center\"/></style:style>\
        <style:style style:name=\"P2\" style:family=\"paragraph\"><style:paragraph-properties fo:margin-left=\"0.5in\"/></style:style>\
        <style:style style:name=\"T1\" style:family=\"text\"/>\
        <style:style style:name=\"P3\" style:family=\"paragraph\"><style:paragraph-properties fo:text-align=\"start\" fo:margin-left=\"0in\"/></style:style>\
        </office:automatic-styles>";

    fn odt(text: &str) -> String {
        OdtExtractor::new().extract(text).to_string()
    }

    #[test]
    fn test_indented_styles() {
        let xml = format!(
            "<office:document-content>{}<office:body><office:text>\
             <text:p text:style-name=\"P1\">Centered</text:p>\
             <text:p text:style-name=\"P2\">Margin</text:p>\
             <text:p text:style-name=\"P3\">Plain</text:p>\
             </office:text></office:body></office:document-content>",
            STYLES
        );
        assert_eq!(odt(&xml), "\n\n\tCentered\n\n\tMargin\n\nPlain");
    }

    #[test]
    fn test_styles_do_not_leak_between_calls() {
        let mut extractor = OdtExtractor::new();
        let styled = format!("{}<text:p text:style-name=\"P1\">x</text:p>", STYLES);
        assert_eq!(extractor.extract(&styled), "\n\n\tx");
        assert_eq!(extractor.extract("<text:p text:style-name=\"P1\">x</text:p>"), "\n\nx");
    }

    #[test]
    fn test_spans_tabs_and_spaces() {
        let xml = "<text:p>Hello <text:span text:style-name=\"T1\">bold</text:span><text:tab/>after\
                   <text:line-break/>next<text:s text:c=\"3\"/>x<text:s/>y</text:p>";
        assert_eq!(odt(xml), "\n\nHello bold\tafter\nnext   x y");
    }

    #[test]
    fn test_text_outside_sections_dropped() {
        let xml = "<office:text>loose<text:p>kept</text:p>\n  <text:p/>tail</office:text>";
        assert_eq!(odt(xml), "\n\nkept\n\n");
    }

    #[test]
    fn test_annotation_skipped() {
        let xml = "<text:p>a<office:annotation><text:p>note</text:p></office:annotation>b</text:p>";
        assert_eq!(odt(xml), "\n\nab");
    }

    #[test]
    fn test_comment_skipped() {
        assert_eq!(odt("<text:p>a<!-- <text:p>x</text:p> -->b</text:p>"), "\n\nab");
    }

    #[test]
    fn test_list_items() {
        let xml = "<text:list><text:list-item><text:p>one</text:p></text:list-item>\
                   <text:list-item><text:p>two</text:p></text:list-item></text:list>";
        assert_eq!(odt(xml), "\n\t\n\none\n\t\n\ntwo");
        let mut extractor = OdtExtractor::new();
        extractor.set_preserve_table_layout(true);
        assert_eq!(extractor.extract(xml), "\n\tone\n\ttwo");
    }

    #[test]
    fn test_table_cells() {
        let xml = "<table:table><table:table-row><table:table-cell><text:p>1</text:p></table:table-cell>\
                   <table:table-cell><text:p>2</text:p></table:table-cell></table:table-row></table:table>";
        assert_eq!(odt(xml), "\n\n\t\n\n1\t\n\n2");
        let mut extractor = OdtExtractor::new();
        extractor.set_preserve_table_layout(true);
        assert_eq!(extractor.extract(xml), "\n\n\t1\t2");
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert_eq!(
            odt("<text:p>a<b c<text:span>d</text:span></text:p>"),
            "\n\na<b cd"
        );
    }

    #[test]
    fn test_unterminated_annotation_halts() {
        assert_eq!(odt("<text:p>a<office:annotation>note</text:p>"), "\n\na");
    }

    #[test]
    fn test_entities() {
        assert_eq!(odt("<text:p>&lt;tag&gt; &amp; &#x263A;</text:p>"), "\n\n<tag> & \u{263A}");
    }
}
