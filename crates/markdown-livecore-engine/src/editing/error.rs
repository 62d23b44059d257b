/// Rejected input at the document boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Inverted edit range {start}..{end}")]
    InvertedRange { start: usize, end: usize },
    #[error("Edit range {start}..{end} is out of bounds (document length: {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}
