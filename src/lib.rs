//! RustyText - Recovering markup-to-plain-text extraction
//!
//! Extractors:
//! - HTML: single-pass tokenizer with entity, Symbol font and malformed-markup recovery
//! - DOCX / PPTX / ODT: the XML streams inside office packages
//! - HHK / HHC: HTML Help index and contents labels
//! - Hyperlink stripper: HTML with `<a href>` wrappers removed
//!
//! Every extraction yields the plain text plus a diagnostic log describing
//! what was repaired along the way.

use rustler::{Atom, Binary, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod extract;
mod resource;
pub mod strategy;
mod term;

pub use crate::core::emitter::TextExtractor;
pub use crate::core::encoding::{decode_input, sniff_charset};
pub use crate::core::sink::{SinkError, TextSink};
pub use crate::core::tokenizer::{ExtractOptions, HtmlExtractor};
pub use crate::extract::{DocxExtractor, HelpIndexExtractor, HyperlinkStripper, OdtExtractor, PptxExtractor};
pub use crate::strategy::Extraction;

use resource::{ExtractorRef, ExtractorResource};
use term::{extractions_to_term, extractor_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// One-shot Extraction
// ============================================================================

/// Run a fresh extractor over a binary and return `{text, log}`
fn run_once<'a, E: TextExtractor>(env: Env<'a>, mut extractor: E, input: Binary<'a>) -> Term<'a> {
    let text = decode_input(input.as_slice());
    extractor.extract(&text);
    extractor_to_term(env, &extractor)
}

/// Extract text from an HTML page
#[rustler::nif]
fn extract_html<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    include_outer_text: bool,
    preserve_line_breaks: bool,
) -> NifResult<Term<'a>> {
    let options = ExtractOptions {
        include_outer_text,
        preserve_line_breaks,
    };
    Ok(run_once(env, HtmlExtractor::with_options(options), input))
}

/// Extract text from a DOCX `word/document.xml` stream
#[rustler::nif]
fn extract_docx<'a>(env: Env<'a>, input: Binary<'a>, preserve_table_layout: bool) -> NifResult<Term<'a>> {
    let mut extractor = DocxExtractor::new();
    extractor.set_preserve_table_layout(preserve_table_layout);
    Ok(run_once(env, extractor, input))
}

/// Extract text from a PPTX `slideN.xml` stream
#[rustler::nif]
fn extract_pptx<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(run_once(env, PptxExtractor::new(), input))
}

/// Extract text from an ODT `content.xml` stream
#[rustler::nif]
fn extract_odt<'a>(env: Env<'a>, input: Binary<'a>, preserve_table_layout: bool) -> NifResult<Term<'a>> {
    let mut extractor = OdtExtractor::new();
    extractor.set_preserve_table_layout(preserve_table_layout);
    Ok(run_once(env, extractor, input))
}

/// Extract entry labels from an HHK or HHC file
#[rustler::nif]
fn extract_help_index<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(run_once(env, HelpIndexExtractor::new(), input))
}

/// Remove hyperlinks from an HTML page, keeping the rest of the markup
#[rustler::nif]
fn strip_hyperlinks<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(run_once(env, HyperlinkStripper::new(), input))
}

/// Charset a page declares for itself, or "" when it declares none
#[rustler::nif(name = "sniff_charset")]
fn sniff_charset_nif(input: Binary) -> String {
    sniff_charset(input.as_slice())
}

// ============================================================================
// Batch Extraction
// ============================================================================

/// Extract many HTML pages in parallel
#[rustler::nif(schedule = "DirtyCpu")]
fn extract_html_batch<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    include_outer_text: bool,
    preserve_line_breaks: bool,
) -> NifResult<Term<'a>> {
    let options = ExtractOptions {
        include_outer_text,
        preserve_line_breaks,
    };
    let decoded: Vec<_> = inputs.iter().map(|input| decode_input(input.as_slice())).collect();
    let documents: Vec<&str> = decoded.iter().map(|text| text.as_ref()).collect();
    let results = strategy::extract_html_batch(&documents, options);
    Ok(extractions_to_term(env, &results))
}

// ============================================================================
// Reusable Extractor
// ============================================================================

fn poisoned() -> rustler::Error {
    rustler::Error::Term(Box::new(term::mutex_poisoned()))
}

/// Create a reusable HTML extractor
#[rustler::nif]
fn extractor_new() -> ExtractorRef {
    ResourceArc::new(ExtractorResource::new())
}

/// Run a reusable extractor over a page
#[rustler::nif]
fn extractor_run<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    input: Binary<'a>,
    include_outer_text: bool,
    preserve_line_breaks: bool,
) -> NifResult<Term<'a>> {
    let mut inner = extractor.lock().map_err(|_| poisoned())?;
    let text = decode_input(input.as_slice());
    inner.extract_with(&text, include_outer_text, preserve_line_breaks);
    Ok(extractor_to_term(env, &*inner))
}

/// Set the separator placed between log messages
#[rustler::nif]
fn extractor_set_log_separator(extractor: ExtractorRef, separator: String) -> NifResult<Atom> {
    let mut inner = extractor.lock().map_err(|_| poisoned())?;
    inner.set_log_separator(&separator);
    Ok(term::ok())
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyText.Native");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_extractors() -> Vec<Box<dyn TextExtractor>> {
        vec![
            Box::new(HtmlExtractor::new()),
            Box::new(HtmlExtractor::with_options(ExtractOptions {
                include_outer_text: false,
                preserve_line_breaks: true,
            })),
            Box::new(DocxExtractor::new()),
            Box::new(PptxExtractor::new()),
            Box::new(OdtExtractor::new()),
            Box::new(HelpIndexExtractor::new()),
            Box::new(HyperlinkStripper::new()),
        ]
    }

    #[test]
    fn test_reexports_cover_every_dialect() {
        let mut extractors = all_extractors();
        for extractor in extractors.iter_mut() {
            assert_eq!(extractor.extract(""), "");
            assert!(extractor.is_empty());
            assert!(extractor.log().is_empty());
        }
    }

    proptest! {
        #[test]
        fn prop_plain_text_round_trips(text in "[a-zA-Z0-9 .,;:!?'\"()\\-\t]{0,200}") {
            let mut extractor = HtmlExtractor::new();
            prop_assert_eq!(extractor.extract(&text), text.as_str());
            prop_assert!(extractor.log().is_empty());
        }

        #[test]
        fn prop_extraction_is_repeatable(text in "(<[a-z/!]{0,6}[^<>]{0,10}>?|&[a-z#0-9]{0,6};?|[^<&]{0,12}){0,30}") {
            for mut extractor in all_extractors() {
                let first = (extractor.extract(&text).to_string(), extractor.log().to_string());
                let second = (extractor.extract(&text).to_string(), extractor.log().to_string());
                prop_assert_eq!(first, second);
            }
        }

        #[test]
        fn prop_arbitrary_input_never_panics(text in "\\PC{0,300}") {
            for mut extractor in all_extractors() {
                let _ = extractor.extract(&text);
            }
            let _ = sniff_charset(text.as_bytes());
        }

        #[test]
        fn prop_arbitrary_bytes_decode(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
            let text = decode_input(&bytes);
            let mut extractor = HtmlExtractor::new();
            let _ = extractor.extract(&text);
            let _ = sniff_charset(&bytes);
        }
    }
}
