//! Extraction Strategy Module
//!
//! - Sequential: one extractor driven directly (see `core` and `extract`)
//! - Parallel: many independent documents across the rayon pool

pub mod parallel;

pub use parallel::{extract_batch, extract_html_batch, Extraction};
