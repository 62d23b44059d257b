//! # Inline Kinds
//!
//! Inline constructs own their delimiters; the tokenizer never hardcodes
//! `[[` or `` ` ``.

pub mod code_span;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use wikilink::WikiLink;
