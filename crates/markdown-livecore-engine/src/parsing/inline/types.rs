use crate::parsing::rope::span::Span;

/// One token of a paragraph, with paragraph-local byte spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain text that isn't part of any special construct.
    Text(Span),
    /// A backtick code span. Raw zone: nothing is parsed inside.
    CodeSpan {
        /// Full span including the backtick runs.
        full: Span,
        /// Content between the backtick runs.
        inner: Span,
    },
    /// A wiki-style link `[[target]]` or `[[target|alias]]`.
    WikiLink {
        full: Span,
        target: Span,
        alias: Option<Span>,
    },
    /// An opening or closing fence line.
    FenceDelimiter {
        full: Span,
        /// Span of the language tag on an opening fence.
        language: Option<Span>,
    },
    /// A line of fenced code content.
    CodeLine(Span),
}

impl Token {
    /// Full span of the token.
    pub fn span(&self) -> Span {
        match self {
            Token::Text(sp) | Token::CodeLine(sp) => *sp,
            Token::CodeSpan { full, .. }
            | Token::WikiLink { full, .. }
            | Token::FenceDelimiter { full, .. } => *full,
        }
    }
}
