//! Hyperlink removal
//!
//! Copies an HTML page through unchanged except for `<a>` wrappers: the
//! opening and closing anchor tags are removed and the link text is kept.
//! Bookmark anchors (`<a name=...>`) are left alone.

use crate::core::elements::{find_bookmark, find_closing_element, find_element, matching_close_angle};
use crate::core::emitter::{Emitter, TextExtractor};

/// HTML hyperlink stripper
#[derive(Debug, Default)]
pub struct HyperlinkStripper {
    emitter: Emitter,
}

impl HyperlinkStripper {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&mut self, text: &str) {
        let mut copied = 0;
        let mut pos = 0;
        let mut bookmark = find_bookmark(text, 0).map(|(at, _)| at);
        while let Some(anchor) = find_element(text, pos, "a", true) {
            if bookmark.is_some_and(|at| at < anchor) {
                bookmark = find_bookmark(text, anchor).map(|(at, _)| at);
            }
            if bookmark == Some(anchor) {
                pos = anchor + 2;
                continue;
            }
            self.emitter.copy_verbatim(&text[copied..anchor]);
            copied = anchor;

            let Some(open_end) = matching_close_angle(text, anchor, false) else {
                self.emitter.log("Unterminated hyperlink tag; the rest of the page was copied as is.");
                break;
            };
            copied = open_end + 1;

            let Some(close) = find_closing_element(text, copied, "a") else {
                self.emitter.log("Hyperlink without a closing </a>; the rest of the page was copied as is.");
                break;
            };
            self.emitter.copy_verbatim(&text[copied..close]);
            copied = close;

            let Some(close_end) = matching_close_angle(text, close, false) else {
                break;
            };
            copied = close_end + 1;
            pos = copied;
        }
        self.emitter.copy_verbatim(&text[copied..]);
    }
}

impl TextExtractor for HyperlinkStripper {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn extract(&mut self, text: &str) -> &str {
        if text.is_empty() {
            self.emitter.reset_empty(0);
        } else if self.emitter.begin(text.len(), 0) {
            self.scan(text);
            self.emitter.finish();
        }
        self.emitter.sink().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(text: &str) -> String {
        HyperlinkStripper::new().extract(text).to_string()
    }

    #[test]
    fn test_links_removed() {
        assert_eq!(
            strip("<p>See <a href=\"a.htm\">the <b>docs</b></a> and <A HREF=b.htm>more</A>.</p>"),
            "<p>See the <b>docs</b> and more.</p>"
        );
    }

    #[test]
    fn test_bookmarks_kept() {
        let page = "<a name=\"top\"></a><h1>Title</h1><a href=\"#top\">Back</a>";
        assert_eq!(strip(page), "<a name=\"top\"></a><h1>Title</h1>Back");
    }

    #[test]
    fn test_bookmarks_between_links() {
        let page = "<a href=1>one</a><a name=mid>m</a><A NAME=\"#low\"></A><a href=2>two</a>";
        assert_eq!(strip(page), "one<a name=mid>m</a><A NAME=\"#low\"></A>two");
    }

    #[test]
    fn test_other_elements_untouched() {
        let page = "<abbr>x</abbr><area href=y>&amp; line\nbreak";
        assert_eq!(strip(page), page);
    }

    #[test]
    fn test_missing_close_keeps_remainder() {
        let mut stripper = HyperlinkStripper::new();
        assert_eq!(stripper.extract("a <a href=x>link text"), "a link text");
        assert!(stripper.log().contains("closing </a>"));
    }

    #[test]
    fn test_unterminated_anchor_keeps_remainder() {
        let mut stripper = HyperlinkStripper::new();
        assert_eq!(stripper.extract("a <a href=\"x"), "a <a href=\"x");
        assert!(!stripper.log().is_empty());
    }

    #[test]
    fn test_no_links() {
        assert_eq!(strip("plain <b>text</b>"), "plain <b>text</b>");
        assert_eq!(strip(""), "");
    }
}
