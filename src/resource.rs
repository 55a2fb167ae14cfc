//! ResourceArc Wrappers
//!
//! Persistent extractor state for callers that extract many pages in a row
//! and want to keep the output allocation and log separator between calls.

use crate::core::tokenizer::HtmlExtractor;
use rustler::ResourceArc;
use std::sync::{Mutex, MutexGuard};

/// Wrapper for HtmlExtractor that can be stored in a ResourceArc
pub struct ExtractorResource {
    pub inner: Mutex<HtmlExtractor>,
}

impl ExtractorResource {
    pub fn new() -> Self {
        ExtractorResource {
            inner: Mutex::new(HtmlExtractor::new()),
        }
    }

    /// Lock the extractor for one call
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if a previous call panicked while holding
    /// the lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, HtmlExtractor>, &'static str> {
        self.inner.lock().map_err(|_| "mutex_poisoned")
    }
}

#[rustler::resource_impl]
impl rustler::Resource for ExtractorResource {}

impl Default for ExtractorResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the ResourceArc
pub type ExtractorRef = ResourceArc<ExtractorResource>;
