use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo, delta::Builder};

/// A text edit, in byte offsets of the document before the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    /// The replaced byte range; empty for insertions.
    pub fn range(&self) -> Range<usize> {
        match self {
            Cmd::InsertText { at, .. } => *at..*at,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => range.clone(),
        }
    }

    /// The inserted text; empty for deletions.
    pub fn text(&self) -> &str {
        match self {
            Cmd::InsertText { text, .. } | Cmd::ReplaceRange { text, .. } => text,
            Cmd::DeleteRange { .. } => "",
        }
    }

    /// Where a caret typing this command ends up, in post-edit offsets.
    pub fn caret_after(&self) -> usize {
        self.range().start + self.text().len()
    }
}

/// Compiles `cmd` into a delta over a buffer of `len` bytes.
///
/// The command must already be validated against the buffer.
pub(crate) fn compile_command(len: usize, cmd: &Cmd) -> Delta<RopeInfo> {
    let mut builder = Builder::new(len);
    match cmd {
        Cmd::InsertText { at, text } => builder.replace(*at..*at, Rope::from(text.as_str())),
        Cmd::DeleteRange { range } => builder.delete(range.clone()),
        Cmd::ReplaceRange { range, text } => {
            builder.replace(range.clone(), Rope::from(text.as_str()))
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str, cmd: &Cmd) -> String {
        let rope = Rope::from(text);
        compile_command(rope.len(), cmd).apply(&rope).to_string()
    }

    #[test]
    fn insert_compiles() {
        let cmd = Cmd::InsertText {
            at: 5,
            text: " there".to_string(),
        };
        assert_eq!(apply("Hello World", &cmd), "Hello there World");
    }

    #[test]
    fn delete_compiles() {
        let cmd = Cmd::DeleteRange { range: 5..11 };
        assert_eq!(apply("Hello World", &cmd), "Hello");
        assert_eq!(cmd.text(), "");
    }

    #[test]
    fn replace_compiles() {
        let cmd = Cmd::ReplaceRange {
            range: 0..5,
            text: "```".to_string(),
        };
        assert_eq!(apply("Hello\nWorld", &cmd), "```\nWorld");
        assert_eq!(cmd.caret_after(), 3);
    }
}
