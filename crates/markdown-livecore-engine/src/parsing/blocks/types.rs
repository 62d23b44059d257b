use serde::Serialize;

use super::kinds::FenceKind;

/// A fenced code region spanning two or more paragraphs.
///
/// `start` is always the opening fence. When `is_closed`, `end` is the closing
/// fence and the content is `(start, end)`. When not closed, `end` is the last
/// paragraph of the document and is itself content: `(start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FencedBlock {
    pub start: usize,
    pub end: usize,
    pub language: Option<String>,
    pub is_closed: bool,
    /// Character of the opening fence.
    pub kind: FenceKind,
}

impl FencedBlock {
    /// Whether `ordinal` is part of this block in any role.
    pub fn contains(&self, ordinal: usize) -> bool {
        (self.start..=self.end).contains(&ordinal)
    }

    /// Whether `ordinal` is content (neither opening nor closing fence).
    pub fn is_content(&self, ordinal: usize) -> bool {
        ordinal > self.start && (ordinal < self.end || (!self.is_closed && ordinal == self.end))
    }

    /// Same `(start, end, is_closed)` triple; languages are not compared.
    pub fn same_bounds(&self, other: &FencedBlock) -> bool {
        self.start == other.start && self.end == other.end && self.is_closed == other.is_closed
    }

    /// Role of `ordinal` within this block, if it is part of it.
    pub fn role_of(&self, ordinal: usize) -> Option<FenceRole> {
        if ordinal == self.start {
            Some(FenceRole::Opening)
        } else if self.is_content(ordinal) {
            Some(FenceRole::Inside)
        } else if self.is_closed && ordinal == self.end {
            Some(FenceRole::Closing)
        } else {
            None
        }
    }

    pub(crate) fn shifted(mut self, delta: isize) -> Self {
        self.start = self.start.wrapping_add_signed(delta);
        self.end = self.end.wrapping_add_signed(delta);
        self
    }
}

/// The part a paragraph plays in its fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FenceRole {
    Opening,
    Inside,
    Closing,
}

/// Structural status of one paragraph, as consumed by the renderer.
///
/// Borrows the block's language from the structure it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphStatus<'a> {
    OpeningFence(Option<&'a str>),
    ClosingFence,
    Inside(Option<&'a str>),
    /// An ordinary paragraph outside every block.
    #[default]
    None,
}

impl<'a> ParagraphStatus<'a> {
    pub(crate) fn from_role(role: FenceRole, language: Option<&'a str>) -> Self {
        match role {
            FenceRole::Opening => ParagraphStatus::OpeningFence(language),
            FenceRole::Inside => ParagraphStatus::Inside(language),
            FenceRole::Closing => ParagraphStatus::ClosingFence,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ParagraphStatus::None)
    }

    pub fn is_fence(&self) -> bool {
        matches!(
            self,
            ParagraphStatus::OpeningFence(_) | ParagraphStatus::ClosingFence
        )
    }

    pub fn language(&self) -> Option<&'a str> {
        match self {
            ParagraphStatus::OpeningFence(lang) | ParagraphStatus::Inside(lang) => *lang,
            _ => None,
        }
    }
}
