use xi_rope::Rope;

use super::span::Span;

/// A single paragraph of the buffer with its byte span.
#[derive(Debug, Clone)]
pub struct ParagraphRef {
    /// Byte span of this paragraph in the rope (includes the newline if present).
    pub span: Span,
    /// The paragraph text, terminating newline included.
    pub text: String,
}

/// Returns an iterator over the paragraphs of a rope with their byte spans.
///
/// Uses `lines_raw` so the terminating newline stays with its paragraph. A
/// trailing newline does not produce an empty final paragraph.
pub fn paragraphs_with_spans(rope: &Rope) -> impl Iterator<Item = ParagraphRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        ParagraphRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

/// Splits `text` into paragraphs, each keeping its terminating `\n`.
///
/// `"a\nb\n"` yields `["a\n", "b\n"]`, `"a"` yields `["a"]` and `""` yields
/// nothing.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Paragraph text without its line terminator (`\n` or `\r\n`).
pub fn strip_terminator(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}
