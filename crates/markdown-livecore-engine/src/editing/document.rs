use std::collections::BTreeSet;
use std::ops::Range;

use xi_rope::Rope;

use crate::editing::{
    CacheStats, Cmd, DocumentError, ParagraphEdit, ParagraphIndex, Patch, TokenCache,
    commands::compile_command,
};
use crate::parsing::{
    blocks::{FenceScanner, FencedBlock, ParagraphStatus, ScanOptions, StructureCache},
    inline::{Token, tokenize},
    rope::{paragraphs_with_spans, split_paragraphs},
};

/// A document kept live for rendering.
///
/// Owns the text and every derived structure: the paragraph index, the
/// fenced block structure and the token cache. All of them are brought up to
/// date by [`apply`](Self::apply) before it returns, so queries never observe
/// a half-applied edit.
#[derive(Debug, Clone)]
pub struct LiveDocument {
    /// xi-rope buffer holding the document bytes verbatim
    buffer: Rope,
    /// Paragraph texts, each with its terminating newline
    paragraphs: Vec<String>,
    index: ParagraphIndex,
    scanner: FenceScanner,
    structure: StructureCache,
    tokens: TokenCache<Vec<Token>>,
    /// Incremented on every edit and load
    version: u64,
}

impl LiveDocument {
    /// An empty document.
    pub fn new(options: ScanOptions) -> Self {
        Self {
            buffer: Rope::from(""),
            paragraphs: Vec::new(),
            index: ParagraphIndex::new(),
            scanner: FenceScanner::new(options),
            structure: StructureCache::default(),
            tokens: TokenCache::new(),
            version: 0,
        }
    }

    pub fn from_text(text: &str, options: ScanOptions) -> Self {
        let mut doc = Self::new(options);
        doc.rebuild(Rope::from(text));
        doc
    }

    /// Create a document from raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8], options: ScanOptions) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text, options))
    }

    /// Replaces the whole text, rebuilding every derived structure.
    pub fn load(&mut self, text: &str) {
        self.rebuild(Rope::from(text));
        self.version += 1;
    }

    fn rebuild(&mut self, buffer: Rope) {
        self.paragraphs = paragraphs_with_spans(&buffer).map(|p| p.text).collect();
        self.index = ParagraphIndex::from_rope(&buffer);
        self.structure = StructureCache::scan(&self.scanner, &self.paragraphs);
        self.tokens.invalidate_all();
        self.buffer = buffer;
        log::debug!(
            "loaded document: {} bytes, {} paragraphs, {} fenced blocks",
            self.buffer.len(),
            self.paragraphs.len(),
            self.structure.blocks().len()
        );
    }

    /// Apply an edit and bring every derived structure up to date.
    ///
    /// Steps, in order: validate the range, derive the paragraph-level edit
    /// from the old index, apply the delta to the rope and splice the
    /// paragraph texts, shift the index, rescan the block structure around
    /// the edit, then invalidate exactly the stale token cache entries.
    ///
    /// The returned [`Patch`] names every paragraph the renderer must lay out
    /// again.
    pub fn apply(&mut self, cmd: &Cmd) -> Result<Patch, DocumentError> {
        let range = cmd.range();
        self.validate(&range)?;

        let (edit, inserted) = self.paragraph_edit(&range, cmd.text());

        let delta = compile_command(self.buffer.len(), cmd);
        self.buffer = delta.apply(&self.buffer);
        self.paragraphs.splice(edit.removed_range(), inserted);
        self.index.apply_edit(&edit, &self.paragraphs);

        let previous = self.structure.structure().clone();
        let rescanned = self
            .structure
            .apply_edit(&self.scanner, &edit, &self.paragraphs);
        let status_changed = self
            .structure
            .status_changes(&previous, &edit, rescanned.clone());

        self.tokens.invalidate_edit(&edit);
        for &ordinal in &status_changed {
            self.tokens.invalidate(ordinal);
        }

        let mut relayout: BTreeSet<usize> = edit.inserted_range().collect();
        relayout.extend(&status_changed);

        self.version += 1;
        debug_assert_eq!(self.buffer.len(), self.index.text_len());
        log::trace!(
            "applied {edit:?}: rescanned {rescanned:?}, {} status changes",
            status_changed.len()
        );

        Ok(Patch {
            edit,
            relayout,
            status_changed,
            rescanned,
            version: self.version,
        })
    }

    fn validate(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        let len = self.len();
        if range.start > range.end {
            return Err(DocumentError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for offset in [range.start, range.end] {
            if !self.is_char_boundary(offset) {
                return Err(DocumentError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }

    fn is_char_boundary(&self, offset: usize) -> bool {
        if offset >= self.len() {
            return offset == self.len();
        }
        let ordinal = self.index.ordinal(offset);
        let local = offset - self.index.start_or_end(ordinal);
        self.paragraphs
            .get(ordinal)
            .is_some_and(|p| p.is_char_boundary(local))
    }

    /// The paragraphs a replacement of `range` by `text` rewrites, and the
    /// texts that replace them.
    ///
    /// The rewritten region starts at the paragraph holding `range.start` and
    /// ends at the first paragraph boundary at or after `range.end`, extended
    /// while the rewritten text would run on into the next paragraph.
    fn paragraph_edit(&self, range: &Range<usize>, text: &str) -> (ParagraphEdit, Vec<String>) {
        let count = self.paragraphs.len();
        let lo = self.index.edit_ordinal(range.start);
        let mut hi = if range.end >= self.index.text_len() {
            count
        } else {
            let k = self.index.ordinal(range.end);
            if self.index.start_or_end(k) == range.end {
                k
            } else {
                k + 1
            }
        };
        hi = hi.max(lo);

        let region_start = self.index.start_or_end(lo);
        let mut region = self.paragraphs[lo..hi].concat();
        region.replace_range(range.start - region_start..range.end - region_start, text);

        // A region without a trailing newline merges with what follows.
        while hi < count && !region.is_empty() && !region.ends_with('\n') {
            region.push_str(&self.paragraphs[hi]);
            hi += 1;
        }

        let inserted: Vec<String> = split_paragraphs(&region)
            .into_iter()
            .map(str::to_owned)
            .collect();
        (ParagraphEdit::new(lo, inserted.len(), hi - lo), inserted)
    }

    /// Tokens of paragraph `ordinal`, memoized. `None` past the end.
    pub fn tokens(&mut self, ordinal: usize) -> Option<&[Token]> {
        let text = self.paragraphs.get(ordinal)?;
        let status = self.structure.status(ordinal);
        let tokens = self
            .tokens
            .get_or_insert_with(ordinal, text, |t| tokenize(status, t));
        Some(tokens.as_slice())
    }

    pub fn token_stats(&self) -> CacheStats {
        self.tokens.stats()
    }

    pub fn status(&self, ordinal: usize) -> ParagraphStatus<'_> {
        self.structure.status(ordinal)
    }

    pub fn structure(&self) -> &StructureCache {
        &self.structure
    }

    pub fn blocks(&self) -> &[FencedBlock] {
        self.structure.blocks()
    }

    pub fn index(&self) -> &ParagraphIndex {
        &self.index
    }

    pub fn scanner(&self) -> &FenceScanner {
        &self.scanner
    }

    /// Text of paragraph `ordinal`, terminating newline included.
    pub fn paragraph(&self, ordinal: usize) -> Option<&str> {
        self.paragraphs.get(ordinal).map(String::as_str)
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// The paragraph holding byte `offset`, clamped to the last paragraph.
    pub fn ordinal_at(&self, offset: usize) -> usize {
        self.index.ordinal(offset)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Length of the document in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }
}

impl Default for LiveDocument {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}
