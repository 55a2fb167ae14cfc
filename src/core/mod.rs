//! Core markup-to-text primitives
//!
//! This module contains the building blocks every extractor shares:
//! - Scanner: SIMD-accelerated byte searches using memchr
//! - Elements: element names, tag ends, depth-aware element search
//! - Attributes: quote-aware attribute lookup
//! - Entities: HTML entity table and numeric reference parsing
//! - Symbols: legacy Symbol font remapping
//! - Sink: output buffer and diagnostic log
//! - Emitter: inter-tag text decoding shared by all extractors
//! - Tokenizer: the recovering HTML scan loop
//! - Encoding: declared-charset sniffing and input decoding

pub mod attributes;
pub mod elements;
pub mod emitter;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod sink;
pub mod symbols;
pub mod tokenizer;
