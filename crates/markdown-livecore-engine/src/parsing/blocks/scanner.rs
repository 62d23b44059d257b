use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::editing::ParagraphEdit;

use super::{
    kinds::{CodeFence, FenceKind, FenceMatching},
    structure::BlockStructure,
    types::FencedBlock,
};

/// Tunables for fence scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Which fence lines close an open block.
    pub fence_matching: FenceMatching,
    /// Paragraphs before the edit point that are rescanned as well.
    pub lookback: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            fence_matching: FenceMatching::SameCharacter,
            lookback: 1,
        }
    }
}

/// A fence that has been opened but not yet closed.
#[derive(Debug)]
struct OpenFence {
    start: usize,
    kind: FenceKind,
    language: Option<String>,
}

impl OpenFence {
    fn close(self, end: usize) -> FencedBlock {
        FencedBlock {
            start: self.start,
            end,
            language: self.language,
            is_closed: true,
            kind: self.kind,
        }
    }

    fn run_to_eof(self, last: usize) -> FencedBlock {
        FencedBlock {
            start: self.start,
            end: last,
            language: self.language,
            is_closed: false,
            kind: self.kind,
        }
    }
}

/// Finds fenced blocks in a paragraph list, from scratch or incrementally.
///
/// The scan is a toggle state machine over paragraphs: outside a block every
/// fence line opens one; inside, a fence line accepted by
/// [`FenceMatching`] closes it. A fence still open at EOF runs to the last
/// paragraph; an opener that is itself the last paragraph has no content and
/// stays an ordinary paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceScanner {
    options: ScanOptions,
}

impl FenceScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Scans every paragraph. O(N).
    pub fn scan_full<S: AsRef<str>>(&self, paragraphs: &[S]) -> BlockStructure {
        let mut blocks = Vec::new();
        self.scan_from(paragraphs, 0, &mut blocks, |_| false);
        log::debug!(
            "full fence scan: {} paragraphs, {} blocks",
            paragraphs.len(),
            blocks.len()
        );
        BlockStructure { blocks }
    }

    /// Rescans from just before `edit_ordinal` to the end of the document.
    ///
    /// `paragraphs` is the post-edit text; every paragraph before
    /// `edit_ordinal` must be unchanged. Returns the rescanned ordinal range.
    pub fn update_incremental<S: AsRef<str>>(
        &self,
        structure: &mut BlockStructure,
        edit_ordinal: usize,
        paragraphs: &[S],
    ) -> Range<usize> {
        let (origin, _tail) = self.rescan_origin(&mut structure.blocks, edit_ordinal, paragraphs);
        let stop = self.scan_from(paragraphs, origin, &mut structure.blocks, |_| false);
        log::debug!(
            "incremental fence scan from {origin} (edit at {edit_ordinal}): {} blocks",
            structure.blocks.len()
        );
        origin..stop
    }

    /// Rescans the region affected by `edit` and reattaches the untouched tail.
    ///
    /// Scanning stops at the first paragraph past the edited region where both
    /// the new scan and the previous structure are outside every block; from
    /// there on the two scans see identical text in identical state, so the
    /// previous blocks are reused shifted by [`ParagraphEdit::delta`].
    pub fn rescan_edit<S: AsRef<str>>(
        &self,
        structure: &mut BlockStructure,
        edit: &ParagraphEdit,
        paragraphs: &[S],
    ) -> Range<usize> {
        let (origin, tail) = self.rescan_origin(&mut structure.blocks, edit.ordinal, paragraphs);
        let settled = edit.ordinal + edit.inserted;

        let mut next = 0usize;
        let stop = self.scan_from(paragraphs, origin, &mut structure.blocks, |ordinal| {
            let Some(old) = edit.to_old(ordinal).filter(|_| ordinal >= settled) else {
                return false;
            };
            while next < tail.len() && tail[next].end < old {
                next += 1;
            }
            !matches!(tail.get(next), Some(b) if b.start < old)
        });

        if stop < paragraphs.len() {
            let delta = edit.delta();
            structure
                .blocks
                .extend(tail[next..].iter().cloned().map(|b| b.shifted(delta)));
        }
        log::debug!(
            "fence rescan {origin}..{stop} for {edit:?}: {} blocks, reused {}",
            structure.blocks.len(),
            if stop < paragraphs.len() {
                tail.len() - next
            } else {
                0
            }
        );
        origin..stop
    }

    /// Drops every block that may be affected by an edit at `edit_ordinal`
    /// and returns where scanning must restart, plus the dropped blocks.
    ///
    /// The restart point is `edit_ordinal - lookback`, moved back to the
    /// opening fence of any block that straddles it so the scan starts in a
    /// known "outside" state. An unclosed block ends wherever the document
    /// does, so it is always rescanned even when it ends before the origin.
    fn rescan_origin<S: AsRef<str>>(
        &self,
        blocks: &mut Vec<FencedBlock>,
        edit_ordinal: usize,
        paragraphs: &[S],
    ) -> (usize, Vec<FencedBlock>) {
        let mut origin = edit_ordinal.saturating_sub(self.options.lookback);
        let mut keep = blocks.partition_point(|b| b.end < origin);
        if let Some(b) = blocks.get(keep)
            && b.start < origin
        {
            origin = b.start;
        }
        if let Some(b) = keep.checked_sub(1).and_then(|k| blocks.get(k))
            && !b.is_closed
        {
            origin = b.start;
            keep -= 1;
        }
        let tail = blocks.split_off(keep);

        // A fence line outside every block can only be an opener that was the
        // last paragraph before the edit, which the scan left without a block.
        if let Some(prev) = origin.checked_sub(1)
            && blocks.last().is_none_or(|b| b.end < prev)
            && paragraphs
                .get(prev)
                .is_some_and(|p| CodeFence::sig(p.as_ref()).is_some())
        {
            origin = prev;
        }
        (origin.min(paragraphs.len()), tail)
    }

    /// Runs the toggle state machine from `from`, appending blocks to `out`.
    ///
    /// Before each paragraph reached in the outside state, `resync` is asked
    /// whether scanning may stop there. Returns the ordinal where scanning
    /// stopped (the paragraph count if it ran to the end).
    fn scan_from<S, F>(
        &self,
        paragraphs: &[S],
        from: usize,
        out: &mut Vec<FencedBlock>,
        mut resync: F,
    ) -> usize
    where
        S: AsRef<str>,
        F: FnMut(usize) -> bool,
    {
        let mut open: Option<OpenFence> = None;

        for (ordinal, text) in paragraphs.iter().enumerate().skip(from) {
            match open.take() {
                None => {
                    if resync(ordinal) {
                        return ordinal;
                    }
                    if let Some(sig) = CodeFence::sig(text.as_ref()) {
                        open = Some(OpenFence {
                            start: ordinal,
                            kind: sig.kind,
                            language: sig.language.map(str::to_owned),
                        });
                    }
                }
                Some(fence) => {
                    let sig = CodeFence::sig(text.as_ref());
                    if CodeFence::closes(self.options.fence_matching, fence.kind, sig) {
                        out.push(fence.close(ordinal));
                    } else {
                        open = Some(fence);
                    }
                }
            }
        }

        if let Some(fence) = open {
            let last = paragraphs.len() - 1;
            if fence.start < last {
                out.push(fence.run_to_eof(last));
            }
        }
        paragraphs.len()
    }
}
