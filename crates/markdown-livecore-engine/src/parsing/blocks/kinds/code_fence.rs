use serde::{Deserialize, Serialize};

use crate::parsing::rope::strip_terminator;

/// Which fence character a fence line is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// How a fence line inside an open block is matched against its opener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FenceMatching {
    /// Only a fence of the opener's character closes the block.
    #[default]
    SameCharacter,
    /// Any fence line closes the block, whichever character it uses.
    AnyFence,
}

/// The facts a single paragraph contributes to fence scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig<'a> {
    pub kind: FenceKind,
    /// Length of the delimiter run (always >= [`CodeFence::MIN_RUN`]).
    pub run: usize,
    /// First word after the delimiter run, if any.
    pub language: Option<&'a str>,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_RUN: usize = 3;

    /// Recognises a fence line: after leading whitespace, a run of at least
    /// [`Self::MIN_RUN`] identical fence characters.
    pub fn sig(paragraph: &str) -> Option<FenceSig<'_>> {
        let t = strip_terminator(paragraph).trim_start();
        let kind = match t.as_bytes().first() {
            Some(&Self::BACKTICK) => FenceKind::Backticks,
            Some(&Self::TILDE) => FenceKind::Tildes,
            _ => return None,
        };
        let ch = Self::delimiter(kind);
        let run = t.bytes().take_while(|&b| b == ch).count();
        if run < Self::MIN_RUN {
            return None;
        }
        let language = t[run..].split_whitespace().next();
        Some(FenceSig {
            kind,
            run,
            language,
        })
    }

    pub fn delimiter(kind: FenceKind) -> u8 {
        match kind {
            FenceKind::Backticks => Self::BACKTICK,
            FenceKind::Tildes => Self::TILDE,
        }
    }

    /// Whether a fence line of `sig` closes a block opened with `opener`.
    pub fn closes(matching: FenceMatching, opener: FenceKind, sig: Option<FenceSig<'_>>) -> bool {
        match (matching, sig) {
            (_, None) => false,
            (FenceMatching::AnyFence, Some(_)) => true,
            (FenceMatching::SameCharacter, Some(sig)) => sig.kind == opener,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn detect_backtick_fence_with_language() {
        let sig = CodeFence::sig("```rust\n").unwrap();
        assert_eq!(sig.kind, FenceKind::Backticks);
        assert_eq!(sig.run, 3);
        assert_eq!(sig.language, Some("rust"));
    }

    #[test]
    fn detect_tilde_fence() {
        let sig = CodeFence::sig("~~~~").unwrap();
        assert_eq!(sig.kind, FenceKind::Tildes);
        assert_eq!(sig.run, 4);
        assert_eq!(sig.language, None);
    }

    #[rstest]
    #[case("hello")]
    #[case("``not a fence")]
    #[case("~~")]
    #[case("")]
    #[case("\n")]
    #[case("text ```")]
    fn no_fence(#[case] line: &str) {
        assert_eq!(CodeFence::sig(line), None);
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        assert!(CodeFence::sig("    ```").is_some());
        assert!(CodeFence::sig("\t~~~ py").is_some());
    }

    #[test]
    fn language_is_first_word_only() {
        let sig = CodeFence::sig("```   python   title=\"x\"\r\n").unwrap();
        assert_eq!(sig.language, Some("python"));
    }

    #[test]
    fn mixed_run_stops_at_other_character() {
        let sig = CodeFence::sig("```~~~").unwrap();
        assert_eq!(sig.run, 3);
        assert_eq!(sig.language, Some("~~~"));
    }

    #[test]
    fn closes_matching_fence() {
        let m = FenceMatching::SameCharacter;
        assert!(CodeFence::closes(m, FenceKind::Backticks, CodeFence::sig("```")));
        assert!(CodeFence::closes(m, FenceKind::Tildes, CodeFence::sig("~~~")));
    }

    #[test]
    fn does_not_close_mismatched_fence() {
        let m = FenceMatching::SameCharacter;
        assert!(!CodeFence::closes(m, FenceKind::Backticks, CodeFence::sig("~~~")));
        assert!(!CodeFence::closes(m, FenceKind::Tildes, CodeFence::sig("```")));
        assert!(!CodeFence::closes(m, FenceKind::Tildes, CodeFence::sig("code")));
    }

    #[test]
    fn any_fence_closes_either_character() {
        let m = FenceMatching::AnyFence;
        assert!(CodeFence::closes(m, FenceKind::Backticks, CodeFence::sig("~~~")));
        assert!(CodeFence::closes(m, FenceKind::Tildes, CodeFence::sig("```")));
    }
}
