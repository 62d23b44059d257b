use std::ops::Range;

/// Shape of one mutation in paragraph terms.
///
/// Paragraphs `[ordinal, ordinal + removed)` of the old text were replaced by
/// paragraphs `[ordinal, ordinal + inserted)` of the new text. Everything
/// before `ordinal` is untouched, and everything after the replaced range is
/// the same text shifted by [`delta`](Self::delta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParagraphEdit {
    pub ordinal: usize,
    pub inserted: usize,
    pub removed: usize,
}

impl ParagraphEdit {
    pub fn new(ordinal: usize, inserted: usize, removed: usize) -> Self {
        Self {
            ordinal,
            inserted,
            removed,
        }
    }

    /// Change in paragraph count.
    pub fn delta(&self) -> isize {
        self.inserted as isize - self.removed as isize
    }

    /// True when the paragraph count did not change.
    pub fn is_in_place(&self) -> bool {
        self.inserted == self.removed
    }

    /// New-text ordinals produced by the edit.
    pub fn inserted_range(&self) -> Range<usize> {
        self.ordinal..self.ordinal + self.inserted
    }

    /// Old-text ordinals consumed by the edit.
    pub fn removed_range(&self) -> Range<usize> {
        self.ordinal..self.ordinal + self.removed
    }

    /// Maps a new ordinal to the old ordinal holding the same text, or `None`
    /// if the paragraph was produced by the edit.
    pub fn to_old(&self, ordinal: usize) -> Option<usize> {
        if ordinal < self.ordinal {
            Some(ordinal)
        } else if ordinal >= self.ordinal + self.inserted {
            Some(ordinal - self.inserted + self.removed)
        } else {
            None
        }
    }

    /// Maps an old ordinal to its new ordinal, or `None` if the edit removed it.
    pub fn to_new(&self, ordinal: usize) -> Option<usize> {
        if ordinal < self.ordinal {
            Some(ordinal)
        } else if ordinal >= self.ordinal + self.removed {
            Some(ordinal - self.removed + self.inserted)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_paragraph_edit() {
        let e = ParagraphEdit::new(2, 2, 1);
        assert_eq!(e.delta(), 1);
        assert!(!e.is_in_place());
        assert_eq!(e.inserted_range(), 2..4);
        assert_eq!(e.to_old(1), Some(1));
        assert_eq!(e.to_old(3), None);
        assert_eq!(e.to_old(4), Some(3));
        assert_eq!(e.to_new(3), Some(4));
        assert_eq!(e.to_new(2), None);
    }

    #[test]
    fn deletion_maps_back() {
        let e = ParagraphEdit::new(1, 0, 3);
        assert_eq!(e.delta(), -3);
        assert_eq!(e.to_old(1), Some(4));
        assert_eq!(e.to_new(2), None);
        assert_eq!(e.to_new(4), Some(1));
    }
}
