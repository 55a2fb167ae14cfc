//! HTML Help index and contents (HHK/HHC) extraction
//!
//! Both files are HTML lists of `<OBJECT type="text/sitemap">` entries; the
//! visible label of each entry is the `value` of its `<param name="Name">`.

use crate::core::attributes::read_attribute;
use crate::core::elements::element_name;
use crate::core::emitter::{Emitter, TextExtractor};
use crate::core::scanner::next_open_angle;

use super::DIALECT_DEPTH;

/// HHK/HHC extractor: one label per paragraph
#[derive(Debug, Default)]
pub struct HelpIndexExtractor {
    emitter: Emitter,
}

impl HelpIndexExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut cursor = next_open_angle(bytes, 0);
        while let Some(start) = cursor {
            if element_name(text, start + 1, true).eq_ignore_ascii_case("param")
                && read_attribute(text, start + 1, "name", false, false)
                    .is_some_and(|name| name.eq_ignore_ascii_case("Name"))
            {
                if let Some(label) = read_attribute(text, start + 1, "value", false, true) {
                    self.emitter.decode_text(label);
                }
                self.emitter.paragraph_break();
            }
            cursor = next_open_angle(bytes, start + 1);
        }
    }
}

impl TextExtractor for HelpIndexExtractor {
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

    const CONTENTS: &str = "<HTML><BODY><OBJECT type=\"text/site properties\">\
        <param name=\"ImageType\" value=\"Folder\"></OBJECT><UL>\
        <LI><OBJECT type=\"text/sitemap\"><param name=\"Name\" value=\"Getting Started\">\
        <param name=\"Local\" value=\"start.htm\"></OBJECT>\
        <UL><LI><OBJECT type=\"text/sitemap\"><PARAM NAME=\"Name\" VALUE=\"Tips &amp; Tricks\">\
        <param name=\"Local\" value=\"tips.htm\"></OBJECT></UL></UL></BODY></HTML>";

    #[test]
    fn test_contents_labels() {
        let mut extractor = HelpIndexExtractor::new();
        assert_eq!(extractor.extract(CONTENTS), "Getting Started\n\nTips & Tricks\n\n");
        assert!(extractor.log().is_empty());
    }

    #[test]
    fn test_other_params_ignored() {
        let hhk = "<param name=\"Keyword\" value=\"k\"><param name=\"Name\" value=\"Index\">";
        assert_eq!(HelpIndexExtractor::new().extract(hhk), "Index\n\n");
    }

    #[test]
    fn test_param_without_value() {
        assert_eq!(HelpIndexExtractor::new().extract("<param name=\"Name\">"), "\n\n");
    }

    #[test]
    fn test_no_entries() {
        let mut extractor = HelpIndexExtractor::new();
        assert_eq!(extractor.extract("<html><body>text only</body></html>"), "");
        assert_eq!(extractor.extract(""), "");
    }
}
