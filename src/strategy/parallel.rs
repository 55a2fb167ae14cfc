//! Parallel Batch Extraction
//!
//! Uses Rayon to extract many independent documents at once. Each worker
//! builds its own extractor and reuses it for the documents it is handed,
//! so no extractor state is ever shared between threads.

use rayon::prelude::*;

use crate::core::emitter::TextExtractor;
use crate::core::tokenizer::{ExtractOptions, HtmlExtractor};

/// Owned result of one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub log: String,
}

impl Extraction {
    /// Snapshot the last result of an extractor
    pub fn from_extractor<E: TextExtractor + ?Sized>(extractor: &E) -> Self {
        Extraction {
            text: extractor.text().to_string(),
            log: extractor.log().to_string(),
        }
    }
}

/// Extract every document in parallel, in input order
pub fn extract_batch<E, F>(documents: &[&str], make: F) -> Vec<Extraction>
where
    E: TextExtractor,
    F: Fn() -> E + Sync + Send,
{
    documents
        .par_iter()
        .map_init(make, |extractor, document| {
            extractor.extract(document);
            Extraction::from_extractor(extractor)
        })
        .collect()
}

/// Extract a batch of HTML pages with the same options
pub fn extract_html_batch(documents: &[&str], options: ExtractOptions) -> Vec<Extraction> {
    log::debug!("extracting {} html documents in parallel", documents.len());
    extract_batch(documents, || HtmlExtractor::with_options(options))
}
