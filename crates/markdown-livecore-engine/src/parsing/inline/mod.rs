//! # Paragraph Tokenizer
//!
//! The stateless `status + text -> tokens` pass whose results the token
//! cache memoizes. It is deliberately simple; only the dependency on
//! paragraph status matters to the structural core.
//!
//! ## Modules
//!
//! - **`types`**: `Token` enum with paragraph-local spans
//! - **`kinds`**: `CodeSpan` and `WikiLink` delimiters
//! - **`cursor`**: byte `Cursor`
//! - **`parser`**: `tokenize()` and `parse_inline()`
//!
//! ## Raw Zones
//!
//! Fenced content is one `CodeLine` token. In ordinary text, code spans take
//! precedence: `` `[[not a link]]` `` is a single `CodeSpan`.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{parse_inline, tokenize};
pub use types::Token;
