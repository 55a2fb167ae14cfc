//! HTML Tokenizer - single-pass recovering markup-to-text scan
//!
//! Walks the input from tag open to tag open, never building a tree:
//! - Comments, scripts, styles and titles are skipped whole
//! - CDATA content is copied through untouched
//! - A stray `<` (followed by whitespace or an entity) is ordinary text
//! - Block elements become paragraph breaks, `br` a line break, list items
//!   and table cells a newline-tab or tab
//! - `pre` regions keep their line breaks
//! - Text set in the legacy Symbol font is remapped to Greek/math characters
//!
//! Malformed markup never fails the scan. A tag with no `>` before the next
//! `<` is emitted as literal text; a comment or script with no end marker
//! halts the scan and keeps what was extracted so far.

use super::attributes::read_attribute;
use super::elements::{classify, element_name, matching_close_angle};
use super::emitter::{Emitter, TextExtractor};
use super::scanner::{find_byte, find_ignore_case, is_space, next_open_angle, starts_with_ignore_case};
use super::symbols::is_symbol_font;

/// Caller options for HTML extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Emit text before the first tag and after the last one
    pub include_outer_text: bool,
    /// Treat the whole document as preformatted (keep line breaks)
    pub preserve_line_breaks: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            include_outer_text: true,
            preserve_line_breaks: false,
        }
    }
}

/// What an element contributes to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    /// `\n\n`
    ParagraphBreak,
    /// `\n`
    LineBreak,
    /// `\n\t`
    ListItem,
    /// `\t`
    TableCell,
    /// Enter a region where line breaks are kept
    Preformatted,
}

/// Start tags and their output (names compared ignoring ASCII case)
const OPEN_ELEMENTS: &[(&str, ElementAction)] = &[
    ("p", ElementAction::ParagraphBreak),
    ("table", ElementAction::ParagraphBreak),
    ("hr", ElementAction::ParagraphBreak),
    ("div", ElementAction::ParagraphBreak),
    ("ol", ElementAction::ParagraphBreak),
    ("ul", ElementAction::ParagraphBreak),
    ("h1", ElementAction::ParagraphBreak),
    ("h2", ElementAction::ParagraphBreak),
    ("h3", ElementAction::ParagraphBreak),
    ("h4", ElementAction::ParagraphBreak),
    ("h5", ElementAction::ParagraphBreak),
    ("h6", ElementAction::ParagraphBreak),
    ("select", ElementAction::ParagraphBreak),
    ("option", ElementAction::ParagraphBreak),
    ("dt", ElementAction::ParagraphBreak),
    ("tr", ElementAction::ParagraphBreak),
    ("section", ElementAction::ParagraphBreak),
    ("br", ElementAction::LineBreak),
    ("li", ElementAction::ListItem),
    ("dd", ElementAction::ListItem),
    ("td", ElementAction::TableCell),
    ("th", ElementAction::TableCell),
    ("pre", ElementAction::Preformatted),
];

/// End tags that close a paragraph-like block
const CLOSE_ELEMENTS: &[(&str, ElementAction)] = &[
    ("/p", ElementAction::ParagraphBreak),
    ("/table", ElementAction::ParagraphBreak),
    ("/h1", ElementAction::ParagraphBreak),
    ("/h2", ElementAction::ParagraphBreak),
    ("/h3", ElementAction::ParagraphBreak),
    ("/h4", ElementAction::ParagraphBreak),
    ("/h5", ElementAction::ParagraphBreak),
    ("/h6", ElementAction::ParagraphBreak),
    ("/div", ElementAction::ParagraphBreak),
    ("/dl", ElementAction::ParagraphBreak),
    ("/select", ElementAction::ParagraphBreak),
    ("/ol", ElementAction::ParagraphBreak),
    ("/ul", ElementAction::ParagraphBreak),
    ("/section", ElementAction::ParagraphBreak),
];

/// Elements whose whole content is skipped, with their end markers
const SUPPRESSED_ELEMENTS: &[(&str, &str)] = &[
    ("script", "</script>"),
    ("noscript", "</noscript>"),
    ("style", "</style>"),
    ("title", "</title>"),
];

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";
const PRE_END: &str = "</pre>";

/// What a `<` turned out to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Comment,
    Suppressed(&'static str),
    StrayAngle,
    CData,
    Tag,
}

fn classify_markup(text: &str, start: usize, name: &str) -> Markup {
    let bytes = text.as_bytes();
    if text[start..].starts_with(COMMENT_START) {
        return Markup::Comment;
    }
    if let Some(end_marker) = classify(SUPPRESSED_ELEMENTS, name, true) {
        return Markup::Suppressed(end_marker);
    }
    match bytes.get(start + 1) {
        Some(&b) if is_space(b) || b == b'&' => return Markup::StrayAngle,
        _ => {}
    }
    if text[start..].starts_with("<![") && starts_with_ignore_case(bytes, start, CDATA_START.as_bytes()) {
        return Markup::CData;
    }
    Markup::Tag
}

/// Whether the tag at `start` selects the Symbol font for the text after it
fn selects_symbol_font(text: &str, start: usize, name: &str) -> bool {
    let css_symbol = || {
        read_attribute(text, start + 1, "font-family", true, true).is_some_and(is_symbol_font)
    };
    if name.eq_ignore_ascii_case("font") {
        read_attribute(text, start + 1, "face", false, true).is_some_and(is_symbol_font) || css_symbol()
    } else {
        css_symbol()
    }
}

/// Recovering HTML-to-text extractor
///
/// Reusable: every call overwrites the previous text and log.
#[derive(Debug, Default)]
pub struct HtmlExtractor {
    emitter: Emitter,
    options: ExtractOptions,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        HtmlExtractor {
            emitter: Emitter::new(),
            options,
        }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ExtractOptions) {
        self.options = options;
    }

    /// Extract with explicit options for this call only
    pub fn extract_with(&mut self, text: &str, include_outer_text: bool, preserve_line_breaks: bool) -> &str {
        let options = ExtractOptions {
            include_outer_text,
            preserve_line_breaks,
        };
        self.scan(text, options);
        self.emitter.sink().as_str()
    }

    /// Reuse a caller-owned allocation for the output
    pub fn bind_buffer(&mut self, buffer: String) {
        self.emitter.sink_mut().bind_buffer(buffer);
    }

    /// Take the output buffer, leaving the extractor empty
    pub fn take_buffer(&mut self) -> String {
        self.emitter.sink_mut().take_buffer()
    }

    fn scan(&mut self, text: &str, options: ExtractOptions) {
        let depth = usize::from(options.preserve_line_breaks);
        if text.is_empty() {
            self.emitter.reset_empty(depth);
            return;
        }
        if !self.emitter.begin(text.len(), depth) {
            return;
        }
        self.scan_markup(text, options.include_outer_text);
        self.emitter.finish();
    }

    fn scan_markup(&mut self, text: &str, include_outer_text: bool) {
        let bytes = text.as_bytes();
        let emitter = &mut self.emitter;

        let Some(first) = next_open_angle(bytes, 0) else {
            if include_outer_text {
                emitter.decode_text(text);
            }
            return;
        };
        if include_outer_text {
            emitter.decode_text(&text[..first]);
        }

        // `cursor` is how far the input has been consumed into the output
        let mut start = first;
        let mut cursor = first;
        loop {
            if starts_with_ignore_case(bytes, start, PRE_END.as_bytes()) {
                emitter.leave_preformatted();
            }
            let name = element_name(text, start + 1, true);
            let mut symbol_section = false;
            let end = match classify_markup(text, start, name) {
                Markup::Comment => match find_str(text, start + 2, COMMENT_END) {
                    Some(pos) => pos + COMMENT_END.len(),
                    None => return,
                },
                Markup::Suppressed(end_marker) => {
                    match find_ignore_case(bytes, start, end_marker.as_bytes()) {
                        Some(pos) => pos + end_marker.len(),
                        None => return,
                    }
                }
                Markup::StrayAngle => {
                    match next_open_angle(bytes, start + 1) {
                        Some(next) => {
                            emitter.decode_text(&text[start..next]);
                            start = next;
                            cursor = next;
                            continue;
                        }
                        None => {
                            emitter.decode_text(&text[start..]);
                            return;
                        }
                    }
                }
                Markup::CData => {
                    let content = start + CDATA_START.len();
                    match find_str(text, content, CDATA_END) {
                        Some(pos) => {
                            emitter.copy_verbatim(&text[content..pos]);
                            pos + CDATA_END.len()
                        }
                        None => {
                            emitter.copy_verbatim(&text[content..]);
                            return;
                        }
                    }
                }
                Markup::Tag => {
                    symbol_section = selects_symbol_font(text, start, name);
                    let action = classify(OPEN_ELEMENTS, name, true)
                        .or_else(|| classify(CLOSE_ELEMENTS, name, true));
                    match action {
                        Some(ElementAction::ParagraphBreak) => emitter.paragraph_break(),
                        Some(ElementAction::LineBreak) => emitter.line_break(),
                        Some(ElementAction::ListItem) => emitter.push_str("\n\t"),
                        Some(ElementAction::TableCell) => emitter.tab(),
                        Some(ElementAction::Preformatted) => emitter.enter_preformatted(),
                        None => {}
                    }
                    let close = matching_close_angle(text, start + 1, true)
                        .or_else(|| next_open_angle(bytes, start + 1));
                    let Some(close) = close else {
                        break;
                    };
                    if bytes[close] == b'<' {
                        // unterminated tag, keep it as text
                        emitter.decode_text(&text[start..close]);
                        start = close;
                        cursor = close;
                        continue;
                    }
                    close + 1
                }
            };
            cursor = end;

            let Some(next) = next_open_angle(bytes, end) else {
                break;
            };
            let before = emitter.sink().len();
            emitter.decode_text(&text[end..next]);
            cursor = next;
            if symbol_section {
                emitter.remap_symbols_since(before);
            }
            start = next;
        }

        if include_outer_text && cursor < bytes.len() {
            emitter.decode_text(&text[cursor..]);
        }
    }
}

impl TextExtractor for HtmlExtractor {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn extract(&mut self, text: &str) -> &str {
        self.scan(text, self.options);
        self.emitter.sink().as_str()
    }
}

/// Case-sensitive substring search from `from`
fn find_str(text: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let first = *needle.as_bytes().first()?;
    let mut pos = from;
    while let Some(candidate) = find_byte(bytes, pos, first) {
        if bytes[candidate..].starts_with(needle.as_bytes()) {
            return Some(candidate);
        }
        pos = candidate + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(text: &str) -> String {
        HtmlExtractor::new().extract(text).to_string()
    }

    fn html_with_log(text: &str) -> (String, String) {
        let mut extractor = HtmlExtractor::new();
        let out = extractor.extract(text).to_string();
        (out, extractor.log().to_string())
    }

    #[test]
    fn test_paragraph_fixture() {
        assert_eq!(html("<p>A</p><p>B</p>"), "\n\nA\n\n\n\nB\n\n");
    }

    #[test]
    fn test_empty_input() {
        let mut extractor = HtmlExtractor::new();
        assert_eq!(extractor.extract(""), "");
        assert_eq!(extractor.log(), "");
    }

    #[test]
    fn test_no_markup_round_trip() {
        assert_eq!(html("Fish &amp; chips"), "Fish & chips");
        assert_eq!(html("line one\r\nline two"), "line one line two");
        assert_eq!(
            HtmlExtractor::new().extract_with("line one\r\nline two", true, true),
            "line one\r\nline two"
        );
    }

    #[test]
    fn test_entity_round_trips() {
        assert_eq!(html("<b>&amp;&lt;&#65;&#x41;&nbsp;</b>"), "&<AA ");
    }

    #[test]
    fn test_outer_text_toggle() {
        let mut extractor = HtmlExtractor::new();
        assert_eq!(extractor.extract_with("lead<b>mid</b>tail", false, false), "mid");
        assert_eq!(extractor.extract_with("lead<b>mid</b>tail", true, false), "leadmidtail");
        assert_eq!(extractor.extract_with("no tags here", false, false), "");
    }

    #[test]
    fn test_line_and_list_elements() {
        assert_eq!(html("a<br>b<br/>c"), "a\nb\nc");
        assert_eq!(html("<ul><li>x<li>y</ul>"), "\n\n\n\tx\n\ty\n\n");
        assert_eq!(html("<tr><td>1<td>2"), "\n\n\t1\t2");
        assert_eq!(html("<th>h</th>"), "\th");
    }

    #[test]
    fn test_case_insensitive_elements() {
        assert_eq!(html("<P>A</P>"), "\n\nA\n\n");
        assert_eq!(html("<BR>"), "\n");
    }

    #[test]
    fn test_definition_list() {
        assert_eq!(html("<dl><dt>T<dd>D</dl>"), "\n\nT\n\tD\n\n");
    }

    #[test]
    fn test_script_and_style_skipped() {
        assert_eq!(html("a<script>var x = '<p>';</script>b"), "ab");
        assert_eq!(html("a<STYLE>p { color: red }</Style>b"), "ab");
        assert_eq!(html("a<noscript>enable js</noscript>b"), "ab");
    }

    #[test]
    fn test_title_suppressed() {
        assert_eq!(html("<title>Page Title</title><p>Body"), "\n\nBody");
    }

    #[test]
    fn test_comment_skipped() {
        assert_eq!(html("a<!-- <p>hidden</p> -->b"), "ab");
    }

    #[test]
    fn test_unterminated_script_halts() {
        let (text, _) = html_with_log("<p>keep<script>lost forever");
        assert_eq!(text, "\n\nkeep");
    }

    #[test]
    fn test_unterminated_comment_halts() {
        assert_eq!(html("x<b>y</b><!-- never closed <p>z"), "xy");
    }

    #[test]
    fn test_stray_angle_is_text() {
        assert_eq!(html("<p>1 < 2</p>"), "\n\n1 < 2\n\n");
        assert_eq!(html("a < b"), "a < b");
    }

    #[test]
    fn test_stray_angle_trailing_text_once() {
        assert_eq!(html("<b>x</b>y < z"), "xy < z");
    }

    #[test]
    fn test_stray_angle_before_entity() {
        assert_eq!(html("<b>x</b><&nbsp;y"), "x< y");
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert_eq!(html("<p>a <b c<i>d</i>"), "\n\na <b cd");
    }

    #[test]
    fn test_cdata_verbatim() {
        assert_eq!(html("<x><![CDATA[a &amp; <b>\n]]></x>"), "a &amp; <b>\n");
        assert_eq!(html("<x><![CDATA[open &lt;"), "open &lt;");
    }

    #[test]
    fn test_preformatted_toggling() {
        let text = "a\nb<pre>c\nd</pre>e\nf";
        assert_eq!(html(text), "a bc\nde f");
    }

    #[test]
    fn test_preformatted_nesting() {
        assert_eq!(html("<pre><pre>x\n</pre>y\n</pre>z\n"), "x\ny\nz ");
    }

    #[test]
    fn test_preformatted_closes_after_stray_angle() {
        assert_eq!(html("<pre>1 < 2</pre>c\nd"), "1 < 2c d");
        assert_eq!(html("<pre>1 2</pre>c\nd"), "1 2c d");
    }

    #[test]
    fn test_preformatted_closes_after_unterminated_tag() {
        assert_eq!(html("<pre>x <b y</pre>c\nd"), "x <b yc d");
    }

    #[test]
    fn test_preserve_line_breaks_floor() {
        let mut extractor = HtmlExtractor::new();
        let text = "<pre>a</pre></pre>b\nc";
        assert_eq!(extractor.extract_with(text, true, true), "ab\nc");
    }

    #[test]
    fn test_symbol_font_face() {
        assert_eq!(html("<font face=\"Symbol\">abc</font>"), "αβχ");
        let (_, log) = html_with_log("<font face=\"Symbol\">abc</font>");
        assert!(log.contains("Symbol font used for the following: \"αβχ\""));
    }

    #[test]
    fn test_symbol_font_css() {
        assert_eq!(html("<span style=\"font-family: Symbol\">p</span> p"), "π p");
        assert_eq!(html("<font style=\"font-family:symbol\">W</font>"), "Ω");
    }

    #[test]
    fn test_symbolic_face_also_remaps() {
        assert_eq!(html("<font face=\"Symbolic\">a</font>"), "α");
    }

    #[test]
    fn test_symbol_decoy_attribute() {
        assert_eq!(html("<font title=\"face=Symbol\" face=\"Arial\">abc</font>"), "abc");
    }

    #[test]
    fn test_quoted_close_angle_in_attribute() {
        assert_eq!(html("<a title=\"x > y\">link</a>"), "link");
    }

    #[test]
    fn test_unencoded_ampersand_single_log() {
        let (text, log) = html_with_log("<p>Tom & Jerry</p>");
        assert_eq!(text, "\n\nTom & Jerry\n\n");
        assert_eq!(log.lines().count(), 1);
    }

    #[test]
    fn test_idempotent_reuse() {
        let mut extractor = HtmlExtractor::new();
        let input = "<p>x &bogus; <font face=Symbol>a</font></p>";
        let first = extractor.extract(input).to_string();
        let first_log = extractor.log().to_string();
        let second = extractor.extract(input).to_string();
        assert_eq!(first, second);
        assert_eq!(first_log, extractor.log());
    }

    #[test]
    fn test_log_separator() {
        let mut extractor = HtmlExtractor::new();
        extractor.set_log_separator(" | ");
        extractor.extract("&bogus; &nope;");
        assert_eq!(
            extractor.log(),
            "Unknown HTML entity: &bogus | Unknown HTML entity: &nope"
        );
    }

    #[test]
    fn test_bound_buffer_reused() {
        let mut extractor = HtmlExtractor::new();
        extractor.bind_buffer(String::with_capacity(256));
        extractor.extract("<p>x</p>");
        let out = extractor.take_buffer();
        assert_eq!(out, "\n\nx\n\n");
        assert!(out.capacity() >= 256);
    }

    #[test]
    fn test_bounded_sink_keeps_prefix() {
        let mut extractor = HtmlExtractor::new();
        extractor.sink_mut().set_capacity_limit(Some(3));
        assert_eq!(extractor.extract("<p>too long</p>"), "\n\nt");
        assert!(extractor.log().contains("fixed capacity"));
    }

    #[test]
    fn test_bounded_sink_sized_by_output() {
        let mut extractor = HtmlExtractor::new();
        extractor.sink_mut().set_capacity_limit(Some(8));
        assert_eq!(extractor.extract("<b><i><u>x</u></i></b>"), "x");
        assert!(extractor.log().is_empty());
    }

    #[test]
    fn test_bounded_symbol_span_stops_output() {
        let page = format!("<font face=Symbol>{}</font>tail", "a".repeat(40));
        let mut extractor = HtmlExtractor::new();
        extractor.sink_mut().set_capacity_limit(Some(page.len()));
        let text = extractor.extract(&page).to_string();
        assert_eq!(text, "\u{3B1}".repeat(34));
        assert!(extractor.log().contains(&format!("\"{}\"", text)));
        assert!(extractor.log().contains("fixed capacity"));
    }
}
