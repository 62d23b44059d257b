use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActiveParagraphTracker, ActiveTransition, Cmd, DocumentError, LiveDocument, Patch};

/// Stable identifier for a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(pub Uuid);

impl PaneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What one edit in a pane asks the renderer to redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneUpdate {
    pub patch: Patch,
    pub transition: ActiveTransition,
    /// The patch's paragraphs plus those whose raw/rendered state flipped.
    pub relayout: BTreeSet<usize>,
}

/// One rendering surface: a live document and its active paragraph.
#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    document: LiveDocument,
    active: ActiveParagraphTracker,
}

impl Pane {
    pub fn new(document: LiveDocument) -> Self {
        Self {
            id: PaneId::new(),
            document,
            active: ActiveParagraphTracker::new(),
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn document(&self) -> &LiveDocument {
        &self.document
    }

    /// Mutable document access for queries that fill caches, like tokens.
    pub fn document_mut(&mut self) -> &mut LiveDocument {
        &mut self.document
    }

    pub fn active(&self) -> Option<usize> {
        self.active.active()
    }

    pub fn is_active(&self, ordinal: usize) -> bool {
        self.active.is_active(ordinal)
    }

    /// Loads `text` with the caret at byte `cursor`.
    pub fn open(&mut self, text: &str, cursor: usize) -> ActiveTransition {
        self.document.load(text);
        self.active.reset(self.document.ordinal_at(cursor))
    }

    /// Applies `cmd`, then makes the paragraph under `cursor` (a post-edit
    /// byte offset) active.
    ///
    /// The active ordinal is first carried across the edit so the transition
    /// names the paragraph that was active before, at its new position.
    pub fn edit(&mut self, cmd: &Cmd, cursor: usize) -> Result<PaneUpdate, DocumentError> {
        let patch = self.document.apply(cmd)?;
        let edit = patch.edit;
        self.active.shift(edit.ordinal + edit.removed, edit.delta());
        self.active.clamp(self.document.paragraph_count());
        let transition = self.active.move_active(self.document.ordinal_at(cursor));

        let mut relayout = patch.relayout.clone();
        relayout.extend(transition.invalidated());
        Ok(PaneUpdate {
            patch,
            transition,
            relayout,
        })
    }

    /// Moves the caret to byte `offset`.
    pub fn move_cursor(&mut self, offset: usize) -> ActiveTransition {
        self.active.move_active(self.document.ordinal_at(offset))
    }
}
