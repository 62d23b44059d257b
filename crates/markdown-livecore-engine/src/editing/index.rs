//! Paragraph index for mapping between byte offsets and paragraph ordinals.
//!
//! Maintains the sorted start offset of every paragraph. Lookups are binary
//! searches; edits splice the table and shift the offsets after the edit.

use std::ops::Range;

use xi_rope::Rope;

use crate::parsing::rope::paragraphs_with_spans;

use super::ParagraphEdit;

/// Tracks paragraph boundaries of one document version.
///
/// `starts[i]` is the byte offset of the first byte of paragraph `i`. The
/// terminating newline belongs to its paragraph, so paragraph `i` covers
/// `starts[i]..starts[i + 1]` (the last one ends at the text length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphIndex {
    starts: Vec<usize>,
    text_len: usize,
    /// Whether text appended at the end starts a new paragraph (empty text,
    /// or text ending in a newline).
    open_tail: bool,
}

impl ParagraphIndex {
    /// Index of an empty document.
    pub fn new() -> Self {
        Self {
            starts: Vec::new(),
            text_len: 0,
            open_tail: true,
        }
    }

    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let mut index = Self::new();
        for p in paragraphs {
            index.starts.push(index.text_len);
            index.text_len += p.as_ref().len();
        }
        index.open_tail = Self::tail_is_open(paragraphs);
        index
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_paragraphs(&crate::parsing::rope::split_paragraphs(text))
    }

    pub fn from_rope(rope: &Rope) -> Self {
        let mut index = Self::new();
        let mut last_ends_with_newline = true;
        for p in paragraphs_with_spans(rope) {
            index.starts.push(p.span.start);
            last_ends_with_newline = p.text.ends_with('\n');
        }
        index.text_len = rope.len();
        index.open_tail = last_ends_with_newline;
        index
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Total byte length of the indexed text.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// The paragraph containing byte `offset`. O(log N).
    ///
    /// Offsets at or past the end clamp to the last paragraph; an empty
    /// document answers 0.
    pub fn ordinal(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// The ordinal an edit starting at `offset` takes effect at.
    ///
    /// Same as [`ordinal`](Self::ordinal), except that an edit at the very end
    /// of text that ends in a newline starts a new paragraph after the last.
    pub fn edit_ordinal(&self, offset: usize) -> usize {
        if offset >= self.text_len && self.open_tail {
            self.len()
        } else {
            self.ordinal(offset)
        }
    }

    /// Byte range of paragraph `ordinal`, terminating newline included.
    ///
    /// # Panics
    /// Panics if `ordinal` was not issued by this index.
    pub fn offset_range(&self, ordinal: usize) -> Range<usize> {
        assert!(
            ordinal < self.starts.len(),
            "paragraph ordinal {ordinal} out of range (paragraphs: {})",
            self.starts.len()
        );
        self.starts[ordinal]..self.start_or_end(ordinal + 1)
    }

    /// Byte offset where paragraph `ordinal` starts, or the text length for
    /// the ordinal just past the end.
    pub fn start_or_end(&self, ordinal: usize) -> usize {
        self.starts.get(ordinal).copied().unwrap_or(self.text_len)
    }

    /// Splices the boundary table for `edit`.
    ///
    /// `paragraphs` is the complete post-edit paragraph list; only the
    /// inserted paragraphs are read. Ordinals after the edited range shift by
    /// `inserted - removed` and their offsets by the change in byte length.
    pub fn apply_edit<S: AsRef<str>>(&mut self, edit: &ParagraphEdit, paragraphs: &[S]) {
        let old_end = edit.ordinal + edit.removed;
        assert!(
            old_end <= self.starts.len(),
            "edit {edit:?} removes past the end (paragraphs: {})",
            self.starts.len()
        );

        let base = self.start_or_end(edit.ordinal);
        let old_region = self.start_or_end(old_end) - base;

        let mut new_starts = Vec::with_capacity(edit.inserted);
        let mut offset = base;
        for p in &paragraphs[edit.inserted_range()] {
            new_starts.push(offset);
            offset += p.as_ref().len();
        }
        let new_region = offset - base;

        self.starts.splice(edit.ordinal..old_end, new_starts);
        let after = edit.ordinal + edit.inserted;
        for start in &mut self.starts[after..] {
            *start = *start + new_region - old_region;
        }
        self.text_len = self.text_len + new_region - old_region;
        self.open_tail = Self::tail_is_open(paragraphs);

        debug_assert_eq!(
            self.starts.len(),
            paragraphs.len(),
            "paragraph index out of step with text after {edit:?}"
        );
    }

    fn tail_is_open<S: AsRef<str>>(paragraphs: &[S]) -> bool {
        paragraphs
            .last()
            .is_none_or(|p| p.as_ref().ends_with('\n'))
    }

    /// Returns the raw start table (for debug validation).
    #[cfg(any(debug_assertions, test))]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }
}

impl Default for ParagraphIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::split_paragraphs;
    use rstest::rstest;

    #[test]
    fn empty_document() {
        let index = ParagraphIndex::from_text("");
        assert!(index.is_empty());
        assert_eq!(index.ordinal(0), 0);
        assert_eq!(index.edit_ordinal(0), 0);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(5, 0)]
    #[case(6, 1)]
    #[case(11, 1)]
    #[case(12, 1)]
    #[case(500, 1)]
    fn ordinal_for_offset(#[case] offset: usize, #[case] expected: usize) {
        let index = ParagraphIndex::from_text("hello\nworld\n");
        assert_eq!(index.ordinal(offset), expected);
    }

    #[test]
    fn offset_ranges_include_newline() {
        let index = ParagraphIndex::from_text("hello\nworld\n");
        assert_eq!(index.offset_range(0), 0..6);
        assert_eq!(index.offset_range(1), 6..12);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn offset_range_rejects_unknown_ordinal() {
        ParagraphIndex::from_text("one\n").offset_range(1);
    }

    #[test]
    fn edit_ordinal_at_end() {
        assert_eq!(ParagraphIndex::from_text("a\nb\n").edit_ordinal(4), 2);
        assert_eq!(ParagraphIndex::from_text("a\nb").edit_ordinal(3), 1);
    }

    #[test]
    fn from_rope_matches_from_text() {
        let text = "# T\n```\ncode\n```\nMore";
        assert_eq!(
            ParagraphIndex::from_rope(&Rope::from(text)),
            ParagraphIndex::from_text(text)
        );
    }

    #[test]
    fn apply_edit_inserting_paragraphs() {
        let mut index = ParagraphIndex::from_text("hello\nworld\n");
        let after = split_paragraphs("```\nhello\nworld\n");
        index.apply_edit(&ParagraphEdit::new(0, 2, 1), &after);
        assert_eq!(index, ParagraphIndex::from_paragraphs(&after));
        assert_eq!(index.starts(), &[0, 4, 10]);
    }

    #[test]
    fn apply_edit_removing_paragraph() {
        let mut index = ParagraphIndex::from_text("# T\n```\ncode\n```\nMore\n");
        let after = split_paragraphs("# T\n```\ncode\nMore\n");
        index.apply_edit(&ParagraphEdit::new(3, 0, 1), &after);
        assert_eq!(index, ParagraphIndex::from_paragraphs(&after));
        assert_eq!(index.ordinal(14), 3);
    }

    #[test]
    fn apply_edit_in_place_shifts_offsets() {
        let mut index = ParagraphIndex::from_text("a\nb\nc\n");
        let after = split_paragraphs("a\nbbbb\nc\n");
        index.apply_edit(&ParagraphEdit::new(1, 1, 1), &after);
        assert_eq!(index.starts(), &[0, 2, 7]);
        assert_eq!(index.text_len(), 9);
    }

    #[test]
    fn apply_edit_appending_without_newline_closes_tail() {
        let mut index = ParagraphIndex::from_text("a\n");
        let after = split_paragraphs("a\nb");
        index.apply_edit(&ParagraphEdit::new(1, 1, 0), &after);
        assert_eq!(index.edit_ordinal(3), 1);
    }
}
