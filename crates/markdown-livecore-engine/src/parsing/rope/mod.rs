pub mod lines;
pub mod span;

pub use lines::{ParagraphRef, paragraphs_with_spans, split_paragraphs, strip_terminator};
pub use span::Span;
