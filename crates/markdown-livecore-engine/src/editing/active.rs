//! Which paragraph of a pane is shown raw.
//!
//! Each pane tracks at most one active paragraph. Cursor moves produce an
//! [`ActiveTransition`] naming the paragraphs whose rendering flips, so the
//! renderer never has to redraw the whole document for a cursor move.

/// The two paragraphs affected by a change of active paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTransition {
    pub previous: Option<usize>,
    pub current: usize,
}

impl ActiveTransition {
    /// True when the active paragraph did not change.
    pub fn is_noop(&self) -> bool {
        self.previous == Some(self.current)
    }

    /// Ordinals to re-layout: none for a no-op, else previous and current.
    pub fn invalidated(&self) -> Vec<usize> {
        if self.is_noop() {
            return Vec::new();
        }
        self.previous
            .into_iter()
            .chain(std::iter::once(self.current))
            .collect()
    }
}

/// Active-paragraph state machine for one pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveParagraphTracker {
    active: Option<usize>,
}

impl ActiveParagraphTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, ordinal: usize) -> bool {
        self.active == Some(ordinal)
    }

    /// Makes `ordinal` the active paragraph.
    pub fn move_active(&mut self, ordinal: usize) -> ActiveTransition {
        let previous = self.active.replace(ordinal);
        ActiveTransition {
            previous,
            current: ordinal,
        }
    }

    /// Keeps the active ordinal on the same paragraph after a structural
    /// edit: if it is at or after `after_ordinal` it moves by `delta`.
    pub fn shift(&mut self, after_ordinal: usize, delta: isize) {
        if let Some(active) = self.active
            && active >= after_ordinal
        {
            let shifted = active.checked_add_signed(delta);
            debug_assert!(
                shifted.is_some(),
                "active paragraph {active} shifted by {delta} below zero"
            );
            self.active = Some(shifted.unwrap_or(0));
        }
    }

    /// Pulls the active ordinal back inside a document of `paragraph_count`
    /// paragraphs; an empty document still keeps paragraph 0 active.
    pub fn clamp(&mut self, paragraph_count: usize) {
        if let Some(active) = self.active {
            self.active = Some(active.min(paragraph_count.saturating_sub(1)));
        }
    }

    /// Forgets the active paragraph.
    pub fn clear(&mut self) -> Option<usize> {
        self.active.take()
    }

    /// Document load: nothing active, then `ordinal`.
    pub fn reset(&mut self, ordinal: usize) -> ActiveTransition {
        self.clear();
        self.move_active(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_previous() {
        let mut t = ActiveParagraphTracker::new();
        let tr = t.move_active(3);
        assert_eq!(tr.previous, None);
        assert_eq!(tr.current, 3);
        assert_eq!(tr.invalidated(), vec![3]);
    }

    #[test]
    fn move_reports_old_and_new() {
        let mut t = ActiveParagraphTracker::new();
        t.move_active(1);
        let tr = t.move_active(4);
        assert_eq!(tr.previous, Some(1));
        assert_eq!(tr.invalidated(), vec![1, 4]);
        assert!(t.is_active(4));
        assert!(!t.is_active(1));
    }

    #[test]
    fn move_to_same_is_noop() {
        let mut t = ActiveParagraphTracker::new();
        t.move_active(2);
        let tr = t.move_active(2);
        assert!(tr.is_noop());
        assert_eq!(tr.previous, Some(2));
        assert!(tr.invalidated().is_empty());
    }

    #[test]
    fn shift_only_moves_at_or_after() {
        let mut t = ActiveParagraphTracker::new();
        t.move_active(5);
        t.shift(6, 3);
        assert_eq!(t.active(), Some(5));
        t.shift(5, 2);
        assert_eq!(t.active(), Some(7));
        t.shift(0, -4);
        assert_eq!(t.active(), Some(3));
    }

    #[test]
    fn shift_without_active_is_noop() {
        let mut t = ActiveParagraphTracker::new();
        t.shift(0, 10);
        assert_eq!(t.active(), None);
    }

    #[test]
    fn clamp_to_document() {
        let mut t = ActiveParagraphTracker::new();
        t.move_active(9);
        t.clamp(4);
        assert_eq!(t.active(), Some(3));
        t.clamp(0);
        assert_eq!(t.active(), Some(0));
    }

    #[test]
    fn reset_forgets_previous() {
        let mut t = ActiveParagraphTracker::new();
        t.move_active(8);
        let tr = t.reset(0);
        assert_eq!(tr.previous, None);
        assert_eq!(t.active(), Some(0));
    }
}
