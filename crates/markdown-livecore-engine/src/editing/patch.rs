use std::collections::BTreeSet;
use std::ops::Range;

use super::ParagraphEdit;

/// Result of applying a command: everything the renderer must redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub edit: ParagraphEdit,
    /// New-text ordinals needing re-layout: the edited paragraphs plus every
    /// paragraph whose fence status changed.
    pub relayout: BTreeSet<usize>,
    /// Ordinals whose status changed without their text changing.
    pub status_changed: BTreeSet<usize>,
    /// Ordinal range the fence scanner re-examined.
    pub rescanned: Range<usize>,
    pub version: u64,
}

impl Patch {
    /// Ordinals from which on paragraphs moved position, if the count changed.
    pub fn shifted_from(&self) -> Option<usize> {
        (!self.edit.is_in_place()).then_some(self.edit.ordinal + self.edit.inserted)
    }
}
