use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::editing::ParagraphEdit;

use super::{
    scanner::FenceScanner,
    types::{FenceRole, FencedBlock, ParagraphStatus},
};

/// All fenced blocks of one document version, sorted by `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStructure {
    pub(crate) blocks: Vec<FencedBlock>,
}

impl BlockStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a structure from blocks in any order.
    pub fn from_blocks(mut blocks: Vec<FencedBlock>) -> Self {
        blocks.sort_by_key(|b| b.start);
        Self { blocks }
    }

    pub fn blocks(&self) -> &[FencedBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block `ordinal` belongs to, in any role. O(log B).
    pub fn block_at(&self, ordinal: usize) -> Option<&FencedBlock> {
        let i = self.blocks.partition_point(|b| b.end < ordinal);
        self.blocks.get(i).filter(|b| b.contains(ordinal))
    }

    /// Status of `ordinal` by binary search over the blocks. O(log B).
    pub fn status(&self, ordinal: usize) -> ParagraphStatus<'_> {
        self.block_at(ordinal)
            .and_then(|b| {
                b.role_of(ordinal)
                    .map(|role| ParagraphStatus::from_role(role, b.language.as_deref()))
            })
            .unwrap_or_default()
    }

    /// Validates structural invariants.
    ///
    /// Asserts that:
    /// - blocks are sorted by `start` and do not overlap
    /// - every block spans at least two paragraphs
    /// - only the last block may be unclosed, and it ends at the last
    ///   paragraph when `paragraph_count` is known
    ///
    /// # Panics
    /// Panics with a descriptive message if any invariant is violated.
    pub fn check(&self, paragraph_count: Option<usize>) {
        for pair in self.blocks.windows(2) {
            assert!(
                pair[0].end < pair[1].start,
                "fenced blocks overlap or are unsorted: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
        for (i, b) in self.blocks.iter().enumerate() {
            assert!(b.start < b.end, "fenced block without a second paragraph: {b:?}");
            if !b.is_closed {
                assert!(
                    i + 1 == self.blocks.len(),
                    "unclosed block is not the last block: {b:?}"
                );
            }
            if let Some(count) = paragraph_count {
                assert!(
                    b.end < count,
                    "fenced block past end of document: {b:?} (paragraphs: {count})"
                );
                assert!(
                    b.is_closed || b.end + 1 == count,
                    "unclosed block does not reach end of document: {b:?} (paragraphs: {count})"
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    role: FenceRole,
    block: usize,
}

/// The believed-true [`BlockStructure`] plus an O(1) status lookup.
///
/// The lookup holds an entry for every paragraph that is part of a block and
/// is derived from the block list alone; it is rebuilt whenever the list
/// changes.
#[derive(Debug, Clone, Default)]
pub struct StructureCache {
    structure: BlockStructure,
    lookup: HashMap<usize, Slot>,
}

impl StructureCache {
    pub fn new(structure: BlockStructure) -> Self {
        let mut cache = Self {
            structure,
            lookup: HashMap::new(),
        };
        cache.rebuild_lookup(None);
        cache
    }

    /// Full scan of `paragraphs`.
    pub fn scan<S: AsRef<str>>(scanner: &FenceScanner, paragraphs: &[S]) -> Self {
        let mut cache = Self {
            structure: scanner.scan_full(paragraphs),
            lookup: HashMap::new(),
        };
        cache.rebuild_lookup(Some(paragraphs.len()));
        cache
    }

    /// Replaces the snapshot after an edit at `edit_ordinal`, rescanning to EOF.
    pub fn update_incremental<S: AsRef<str>>(
        &mut self,
        scanner: &FenceScanner,
        edit_ordinal: usize,
        paragraphs: &[S],
    ) -> Range<usize> {
        let rescanned = scanner.update_incremental(&mut self.structure, edit_ordinal, paragraphs);
        self.rebuild_lookup(Some(paragraphs.len()));
        rescanned
    }

    /// Replaces the snapshot after `edit`, rescanning only the affected region.
    pub fn apply_edit<S: AsRef<str>>(
        &mut self,
        scanner: &FenceScanner,
        edit: &ParagraphEdit,
        paragraphs: &[S],
    ) -> Range<usize> {
        let rescanned = scanner.rescan_edit(&mut self.structure, edit, paragraphs);
        self.rebuild_lookup(Some(paragraphs.len()));
        rescanned
    }

    pub fn structure(&self) -> &BlockStructure {
        &self.structure
    }

    pub fn blocks(&self) -> &[FencedBlock] {
        self.structure.blocks()
    }

    pub fn block_at(&self, ordinal: usize) -> Option<&FencedBlock> {
        self.lookup
            .get(&ordinal)
            .map(|slot| &self.structure.blocks[slot.block])
    }

    /// Status of `ordinal`; unknown ordinals are ordinary paragraphs.
    pub fn status(&self, ordinal: usize) -> ParagraphStatus<'_> {
        match self.lookup.get(&ordinal) {
            Some(slot) => {
                let language = self.structure.blocks[slot.block].language.as_deref();
                ParagraphStatus::from_role(slot.role, language)
            }
            None => ParagraphStatus::None,
        }
    }

    pub fn is_closing_fence(&self, ordinal: usize) -> bool {
        matches!(self.status(ordinal), ParagraphStatus::ClosingFence)
    }

    pub fn is_in_block(&self, ordinal: usize) -> bool {
        self.lookup.contains_key(&ordinal)
    }

    /// Ordinals of every paragraph that is part of a block, ascending.
    pub fn block_paragraphs(&self) -> BTreeSet<usize> {
        self.lookup.keys().copied().collect()
    }

    /// Paragraphs that are part of a block in exactly one of the two snapshots.
    ///
    /// Identical block lists short-circuit to the empty set in O(blocks).
    pub fn changed_paragraphs(&self, other: &StructureCache) -> BTreeSet<usize> {
        let (a, b) = (self.blocks(), other.blocks());
        if a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_bounds(y)) {
            return BTreeSet::new();
        }
        self.block_paragraphs()
            .symmetric_difference(&other.block_paragraphs())
            .copied()
            .collect()
    }

    /// Paragraphs in `rescanned` whose status differs from `previous`.
    ///
    /// `previous` is the block list from before `edit`; ordinals are mapped
    /// through the edit. Paragraphs created by the edit are skipped since the
    /// caller relays them out anyway.
    pub fn status_changes(
        &self,
        previous: &BlockStructure,
        edit: &ParagraphEdit,
        rescanned: Range<usize>,
    ) -> BTreeSet<usize> {
        let inserted = edit.inserted_range();
        rescanned
            .filter(|p| !inserted.contains(p))
            .filter(|&p| {
                edit.to_old(p)
                    .is_some_and(|old| self.status(p) != previous.status(old))
            })
            .collect()
    }

    fn rebuild_lookup(&mut self, paragraph_count: Option<usize>) {
        #[cfg(debug_assertions)]
        self.structure.check(paragraph_count);
        #[cfg(not(debug_assertions))]
        let _ = paragraph_count;

        self.lookup.clear();
        for (i, b) in self.structure.blocks.iter().enumerate() {
            for ordinal in b.start..=b.end {
                if let Some(role) = b.role_of(ordinal) {
                    self.lookup.insert(ordinal, Slot { role, block: i });
                }
            }
        }
    }
}

impl PartialEq for StructureCache {
    fn eq(&self, other: &Self) -> bool {
        self.structure == other.structure
    }
}

impl Eq for StructureCache {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{blocks::kinds::FenceKind, rope::split_paragraphs};
    use pretty_assertions::assert_eq;

    fn block(start: usize, end: usize, is_closed: bool) -> FencedBlock {
        FencedBlock {
            start,
            end,
            language: None,
            is_closed,
            kind: FenceKind::Backticks,
        }
    }

    fn cache(text: &str) -> StructureCache {
        StructureCache::scan(&FenceScanner::default(), &split_paragraphs(text))
    }

    #[test]
    fn status_of_closed_block() {
        let c = cache("# T\n```rust\ncode\n```\nMore\n");
        assert_eq!(c.status(0), ParagraphStatus::None);
        assert_eq!(c.status(1), ParagraphStatus::OpeningFence(Some("rust")));
        assert_eq!(c.status(2), ParagraphStatus::Inside(Some("rust")));
        assert_eq!(c.status(3), ParagraphStatus::ClosingFence);
        assert_eq!(c.status(4), ParagraphStatus::None);
    }

    #[test]
    fn out_of_range_status_is_none() {
        let c = cache("```\nx\n```\n");
        assert_eq!(c.status(99), ParagraphStatus::None);
        assert!(!c.is_closing_fence(99));
    }

    #[test]
    fn unclosed_tail_is_inside_not_closing() {
        let c = cache("intro\n```\na\nb\n");
        assert_eq!(c.status(3), ParagraphStatus::Inside(None));
        assert!(!c.is_closing_fence(3));
    }

    #[test]
    fn changed_paragraphs_with_self_is_empty() {
        let c = cache("```\nx\n```\ny\n~~~\n");
        assert!(c.changed_paragraphs(&c).is_empty());
    }

    #[test]
    fn changed_paragraphs_is_symmetric_difference() {
        let a = StructureCache::new(BlockStructure::from_blocks(vec![block(1, 3, true)]));
        let b = StructureCache::new(BlockStructure::from_blocks(vec![block(2, 5, true)]));
        assert_eq!(a.block_paragraphs(), BTreeSet::from([1, 2, 3]));
        assert_eq!(a.changed_paragraphs(&b), BTreeSet::from([1, 4, 5]));
        assert_eq!(b.changed_paragraphs(&a), BTreeSet::from([1, 4, 5]));
    }

    #[test]
    fn changed_paragraphs_ignores_block_order() {
        let a = StructureCache::new(BlockStructure::from_blocks(vec![
            block(0, 2, true),
            block(5, 7, true),
        ]));
        let b = StructureCache::new(BlockStructure::from_blocks(vec![
            block(5, 7, true),
            block(0, 2, true),
        ]));
        assert!(a.changed_paragraphs(&b).is_empty());
    }

    #[test]
    fn structure_status_agrees_with_lookup() {
        let c = cache("a\n```py\nb\n```\nc\n~~~\nd\n");
        for ordinal in 0..8 {
            assert_eq!(c.structure().status(ordinal), c.status(ordinal));
        }
    }

    #[test]
    fn block_at_finds_owner() {
        let c = cache("a\n```\nb\n```\nc\n");
        assert_eq!(c.block_at(2).map(|b| b.start), Some(1));
        assert_eq!(c.block_at(0), None);
        assert_eq!(c.structure().block_at(3).map(|b| b.end), Some(3));
        assert_eq!(c.structure().block_at(4), None);
    }

    #[test]
    fn status_changes_reports_reclassified_paragraphs() {
        let scanner = FenceScanner::default();
        let before = split_paragraphs("# T\n```\ncode\n```\nMore\n");
        let mut current = StructureCache::scan(&scanner, &before);
        let previous = current.structure().clone();
        let after = split_paragraphs("# T\n```\ncode\nMore\n");
        let edit = ParagraphEdit::new(3, 0, 1);
        let rescanned = current.apply_edit(&scanner, &edit, &after);
        assert_eq!(
            current.status_changes(&previous, &edit, rescanned),
            BTreeSet::from([3])
        );
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn check_rejects_overlap() {
        BlockStructure::from_blocks(vec![block(0, 4, true), block(2, 6, true)]).check(None);
    }

    #[test]
    #[should_panic(expected = "does not reach end")]
    fn check_rejects_short_unclosed_block() {
        BlockStructure::from_blocks(vec![block(0, 2, false)]).check(Some(5));
    }
}
