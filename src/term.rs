//! Elixir Term Conversion Utilities
//!
//! Converts extraction results to Elixir terms. Every extraction is returned
//! as a `{text, log}` tuple of binaries.

use rustler::{Encoder, Env, NewBinary, Term};

use crate::core::emitter::TextExtractor;
use crate::strategy::Extraction;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    mutex_poisoned,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `{text, log}` for the last call of an extractor
pub fn extractor_to_term<'a, E: TextExtractor + ?Sized>(env: Env<'a>, extractor: &E) -> Term<'a> {
    (str_to_binary(env, extractor.text()), str_to_binary(env, extractor.log())).encode(env)
}

/// `{text, log}` for an owned result
pub fn extraction_to_term<'a>(env: Env<'a>, extraction: &Extraction) -> Term<'a> {
    (str_to_binary(env, &extraction.text), str_to_binary(env, &extraction.log)).encode(env)
}

/// List of `{text, log}` tuples, in input order
pub fn extractions_to_term<'a>(env: Env<'a>, extractions: &[Extraction]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for extraction in extractions.iter().rev() {
        list = list.list_prepend(extraction_to_term(env, extraction));
    }
    list
}
